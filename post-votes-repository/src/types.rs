//! Response types for batched vote log operations.

use post_votes_shared::types::{PostId, UserId};

/// Result of a batch operation for a single vote.
///
/// Represents the outcome of writing one vote event within a batch and carries the
/// error message if it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOperationResult {
    pub post_id: PostId,
    pub user_id: UserId,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<String>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Lets callers handle partial failures: a failing vote does not prevent the rest of
/// the batch from being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOperationSummary {
    /// Total number of votes in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each vote.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Records the outcome of one vote.
    pub fn record(&mut self, post_id: PostId, user_id: UserId, error: Option<String>) {
        self.total += 1;
        if error.is_some() {
            self.failed += 1;
        } else {
            self.succeeded += 1;
        }
        self.results.push(BatchOperationResult {
            post_id,
            user_id,
            success: error.is_none(),
            error,
        });
    }

    /// Iterates over the failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
