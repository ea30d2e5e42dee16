//! Repository Module
//!
//! CRUD and query helpers over the SQLite pool. Functions that participate
//! in multi-step transactions accept `impl SqliteExecutor` so callers can
//! pass either the pool or an open transaction.

// Catalog
pub mod package_size;
pub mod recipe;

// Identity
pub mod client;

// Inventory
pub mod batch;
pub mod reservation;

// Orders
pub mod order;

// Aggregates
pub mod stats;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(err.to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
