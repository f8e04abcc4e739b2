//! Repository Module
//!
//! One module per table; free async functions over `&SqlitePool`.
//! Multi-statement atomic units take a `sqlx::Transaction` so the caller
//! controls the transactional boundary.

// Tenant
pub mod date_block;
pub mod restaurant;

// Capacity ledger
pub mod time_slot;

// Bookings
pub mod customer;
pub mod reservation;

// Call channel
pub mod call_record;
pub mod callback;

// Aggregates
pub mod daily_stats;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Lost a race on capacity or a status transition; caller retries
    /// through availability, never blindly
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
