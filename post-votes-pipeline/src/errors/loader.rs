//! Error types for the loader module of the Post Votes Pipeline.
//! Defines errors that can occur while flushing vote batches to the vote log.
use thiserror::Error;
use post_votes_repository::VoteLogError;

/// Represents errors that can occur within the vote loader.
///
/// Only failures that prevent a whole batch from being attempted surface here;
/// per-vote failures are reported in the batch summary instead.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Vote log error: {0}")]
    VoteLog(#[from] VoteLogError),
}
