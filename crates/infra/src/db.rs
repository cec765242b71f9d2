use sqlx::PgPool;

/// Connection pool shared by every repo and loader.
pub type Db = PgPool;

/// SQLSTATE raised when a serializable transaction loses a conflict.
pub const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE raised when Postgres breaks a deadlock by aborting one side.
pub const DEADLOCK_DETECTED: &str = "40P01";

/// True when the error is a transient conflict the caller may retry.
pub fn is_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        ),
        _ => false,
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
