use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Actor;

/// Who created / last touched a record, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: Actor,
    pub created_at: DateTime<Utc>,
    pub updated_by: Actor,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    pub fn new(actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            created_by: actor.clone(),
            created_at: now,
            updated_by: actor.clone(),
            updated_at: now,
        }
    }

    pub fn touch(&mut self, actor: &Actor, now: DateTime<Utc>) {
        self.updated_by = actor.clone();
        self.updated_at = now;
    }
}
