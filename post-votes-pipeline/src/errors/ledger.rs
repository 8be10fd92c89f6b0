//! Error types for the vote ledger store.
use post_votes_shared::types::PostId;
use thiserror::Error;

/// Represents a failure of the ledger store backing the live ranking.
///
/// In both cases the vote that hit the error was not applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Transient, the caller may retry.
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
    #[error("Score of post {0} would overflow")]
    ScoreOverflow(PostId),
}
