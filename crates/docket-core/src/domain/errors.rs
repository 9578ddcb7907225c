//! Errors - エラー型と運用上の分類

use thiserror::Error;

/// Operational classification of a [`DocketError`].
///
/// - `Validation`: caller input was rejected before any mutation.
/// - `NotFound`: the referenced entity does not exist for this tenant.
/// - `Conflict`: the entity is not in a state that permits the operation,
///   either because of the state machine or because another actor won a race.
/// - `Infrastructure`: a store, gateway or notification backend failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum DocketError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// Tenant mismatch is reported here too, so existence never leaks across tenants.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A status-guarded write found the row already moved on.
    #[error("concurrent update lost for {entity} {id}")]
    Concurrency { entity: &'static str, id: String },

    #[error("job gateway error: {0}")]
    Gateway(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("config error: {0}")]
    Config(String),
}

impl DocketError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Config(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidState(_) | Self::Concurrency { .. } => ErrorKind::Conflict,
            Self::Gateway(_) | Self::Store(_) | Self::Notification(_) => ErrorKind::Infrastructure,
        }
    }

    /// True for errors that mean "someone else already handled it".
    ///
    /// The sweep skips these; manual commands surface them.
    pub fn is_benign_race(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

pub type Result<T, E = DocketError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_state(DocketError::invalid_state("already triggered"), true)]
    #[case::concurrency(DocketError::Concurrency { entity: "reminder", id: "rem-1".into() }, true)]
    #[case::validation(DocketError::validation("too soon"), false)]
    #[case::not_found(DocketError::not_found("reminder", "rem-1"), false)]
    #[case::store(DocketError::Store("down".into()), false)]
    fn benign_race_classification(#[case] err: DocketError, #[case] benign: bool) {
        assert_eq!(err.is_benign_race(), benign);
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = DocketError::not_found("work item", "wi-42");
        assert_eq!(err.to_string(), "work item not found: wi-42");
    }
}
