//! Error types for the persistence layer

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to PostgreSQL
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid input data (bad connection string, unknown enum value, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database unreachable or authentication failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row or entity doesn't exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// SQL errors, constraint violations
    #[error("Database error: {0}")]
    Database(String),

    /// Connection pool issues
    #[error("Pool error: {0}")]
    Pool(String),
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            return Error::Database(format!("{}: {}", db_error.code().code(), db_error.message()));
        }
        Error::Database(format!("{:?}", err))
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Error::Pool(err.to_string())
    }
}

impl From<deadpool_postgres::BuildError> for Error {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = Error::Validation("bad connection string".to_string());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("bad connection string"));
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::NotFound("query 42".to_string());
        assert_eq!(err.to_string(), "Not found: query 42");
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Validation(_)));
    }
}
