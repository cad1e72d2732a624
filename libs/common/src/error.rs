//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A write collided with a unique constraint
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl DatabaseError {
    /// Classify a failed query, separating unique constraint violations
    pub fn from_query(err: SqlxError) -> Self {
        match &err {
            SqlxError::Database(db) if db.is_unique_violation() => {
                DatabaseError::UniqueViolation(db.message().to_string())
            }
            _ => DatabaseError::Query(err),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
