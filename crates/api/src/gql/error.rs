/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`.
///
///   - `From<sqlx::Error>` logs the DB detail and shows a sanitized message to clients
///   - `From<uuid::Error>` shows "Invalid ID: …"
///   - `GqlError::new("…")` for one-off messages
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Uuid(uuid::Error),
    Custom(String),
}

impl GqlError {
    pub fn new(msg: impl Into<String>) -> Self {
        GqlError::Custom(msg.into())
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) => {
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Uuid(e) => write!(f, "Invalid ID: {e}"),
            GqlError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<uuid::Error> for GqlError {
    fn from(e: uuid::Error) -> Self {
        GqlError::Uuid(e)
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid league ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_sanitized() {
        let err = GqlError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.to_string(), "Internal database error");
    }

    #[test]
    fn gql_err_prefixes_context() {
        let parsed: Result<uuid::Uuid, _> = uuid::Uuid::parse_str("nope");
        let err = parsed.gql_err("Invalid league ID").unwrap_err();
        assert!(err.message.starts_with("Invalid league ID: "));
    }
}
