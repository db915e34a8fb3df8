//! Repository-level error type.
//!
//! Repositories that decide domain outcomes (existence, capacity, uniqueness)
//! return [`RepoError`]; plain lookups keep returning `sqlx::Error`.

use fitstudio_core::booking::conflict_message;
use fitstudio_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A domain outcome (not found, already exists, capacity exhausted).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Convert unique violations on known `uq_` constraints into
/// [`CoreError::AlreadyExists`]; pass everything else through.
pub fn classify(err: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(message) = db_err.constraint().and_then(conflict_message) {
                return RepoError::Core(CoreError::AlreadyExists(message.to_string()));
            }
        }
    }
    RepoError::Database(err)
}

/// Whether `err` is a foreign key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        assert_matches!(
            classify(sqlx::Error::RowNotFound),
            RepoError::Database(sqlx::Error::RowNotFound)
        );
        assert!(!is_foreign_key_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn core_errors_convert() {
        let id = fitstudio_core::types::new_id();
        let err: RepoError = CoreError::CapacityExhausted { class_id: id }.into();
        assert_matches!(err, RepoError::Core(CoreError::CapacityExhausted { .. }));
    }
}
