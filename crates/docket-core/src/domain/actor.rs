use serde::{Deserialize, Serialize};
use std::fmt;

/// The user (or system process) performing an operation.
///
/// Passed explicitly into every mutating call and stamped into audit fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor(String);

impl Actor {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Actor used by the background sweep.
    pub fn system() -> Self {
        Self("system:reminder-sweep".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
