use async_graphql::SimpleObject;

// Error codes returned in mutation payloads
pub const ERR_UNKNOWN: &str = "ERR_UNKNOWN";
pub const ERR_DUPLICATE: &str = "ERR_DUPLICATE";
pub const ERR_INVALID_INPUT: &str = "ERR_INVALID_INPUT";
pub const ERR_NOT_FOUND: &str = "ERR_NOT_FOUND";
pub const ERR_UNSUPPORTED_MODE: &str = "ERR_UNSUPPORTED_MODE";

/// Error entry of a mutation payload.
#[derive(SimpleObject, Clone, Debug, PartialEq, Eq)]
pub struct MutationError {
    pub code: String,
    pub message: String,
}

impl MutationError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(ERR_UNKNOWN, "An unknown error occurred")
    }

    /// Translate a failed insert. Detail is logged, never returned.
    pub fn from_storage(e: &sqlx::Error, duplicate_message: &str, missing_message: &str) -> Self {
        if infra::db::is_unique_violation(e) {
            Self::new(ERR_DUPLICATE, duplicate_message)
        } else if infra::db::is_foreign_key_violation(e) {
            Self::new(ERR_NOT_FOUND, missing_message)
        } else {
            tracing::error!("Database error: {e}");
            Self::unknown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_storage_errors_are_unknown() {
        let err = MutationError::from_storage(&sqlx::Error::PoolTimedOut, "dup", "missing");
        assert_eq!(err, MutationError::unknown());
    }
}
