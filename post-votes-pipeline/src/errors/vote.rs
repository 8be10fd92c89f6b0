//! Error types returned to callers of the ingress fast path.
use thiserror::Error;
use crate::errors::LedgerError;

/// Permanent reasons for refusing a vote.
///
/// Each variant carries a stable reason code so the request layer can map it
/// to a user-facing message without matching on display strings.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("Post not found")]
    NotFound,
    #[error("Voting window has closed")]
    Expired,
    #[error("Vote already cast")]
    Repeated,
}

impl VoteRejection {
    /// Stable reason code for this rejection.
    pub fn code(&self) -> &'static str {
        match self {
            VoteRejection::NotFound => "not_found",
            VoteRejection::Expired => "expired",
            VoteRejection::Repeated => "repeated",
        }
    }
}

/// Represents the outcome of a vote that was not accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VoteError {
    #[error("Vote rejected: {0}")]
    Rejected(#[from] VoteRejection),
    #[error("Transient store error: {0}")]
    TransientStore(#[from] LedgerError),
}

impl VoteError {
    /// Whether the caller may retry the same vote later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, VoteError::TransientStore(LedgerError::Unavailable(_)))
    }

    /// The permanent rejection reason, if this is one.
    pub fn rejection(&self) -> Option<VoteRejection> {
        match self {
            VoteError::Rejected(reason) => Some(*reason),
            VoteError::TransientStore(_) => None,
        }
    }
}
