//! Custom error types for the common library
//!
//! `DatabaseError` covers pool setup and migrations. `RepositoryError` is what
//! entity repositories return; it classifies a driver failure once so the
//! HTTP layer can map it without looking at error text.

use std::collections::BTreeMap;

use serde::Serialize;
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
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Validation failures keyed by the offending input field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field; the first message per field wins
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Error returned by entity repositories
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// The requested row does not exist
    #[error("not found")]
    NotFound,

    /// A unique constraint rejected the write, or the row is still referenced
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Input failed validation
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Any other driver failure
    #[error("database error: {0}")]
    Database(#[source] SqlxError),
}

impl RepositoryError {
    /// Classify a driver error
    pub fn from_sqlx(e: SqlxError) -> Self {
        if let SqlxError::RowNotFound = e {
            return Self::NotFound;
        }
        if let SqlxError::Database(ref db_err) = e {
            let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
            if db_err.is_unique_violation() {
                return Self::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return Self::InvalidReference(constraint);
            }
        }
        Self::Database(e)
    }

    /// Deletes hit foreign keys only when other rows still point at the target
    pub fn on_delete(self) -> Self {
        match self {
            Self::InvalidReference(constraint) => Self::Conflict(constraint),
            other => other,
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(e: SqlxError) -> Self {
        Self::from_sqlx(e)
    }
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;
