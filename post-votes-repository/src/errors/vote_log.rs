//! Error types for the vote log repository.
//! Defines specific errors that can occur during database operations on the durable vote log.
use thiserror::Error;

/// Represents errors that can occur within the vote log repository.
///
/// This enum consolidates various error conditions specific to database interactions,
/// such as SQLx errors during database operations or rows that cannot be decoded.
#[derive(Debug, Error)]
pub enum VoteLogError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid vote value: {0}")]
    InvalidVoteValue(i16),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}
