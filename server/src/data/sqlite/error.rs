//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration {version} ({name}) failed: {error}")]
    MigrationFailed {
        version: i32,
        name: String,
        error: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqliteError {
    fn database_error_kind(&self) -> Option<sqlx::error::ErrorKind> {
        match self {
            Self::Database(sqlx::Error::Database(db)) => Some(db.kind()),
            _ => None,
        }
    }

    /// True when the underlying error is a UNIQUE constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self.database_error_kind(),
            Some(sqlx::error::ErrorKind::UniqueViolation)
        )
    }

    /// True when the underlying error is a FOREIGN KEY constraint violation
    pub fn is_fk_violation(&self) -> bool {
        matches!(
            self.database_error_kind(),
            Some(sqlx::error::ErrorKind::ForeignKeyViolation)
        )
    }

    /// True when the underlying error is any CHECK constraint violation
    pub fn is_check_violation(&self) -> bool {
        matches!(
            self.database_error_kind(),
            Some(sqlx::error::ErrorKind::CheckViolation)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failed_error_display() {
        let err = SqliteError::MigrationFailed {
            version: 2,
            name: "add_stock_table".to_string(),
            error: "syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Migration 2 (add_stock_table) failed: syntax error"
        );
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sqlite_err: SqliteError = io_err.into();
        assert!(sqlite_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_non_database_errors_are_not_violations() {
        let err = SqliteError::Database(sqlx::Error::RowNotFound);
        assert!(!err.is_unique_violation());
        assert!(!err.is_fk_violation());
        assert!(!err.is_check_violation());
    }
}
