//! This module defines the `VoteLoader` struct responsible for flushing vote
//! batches to the durable vote log.
use std::sync::Arc;

pub use post_votes_repository::{BatchOperationSummary, VoteLogRepository};
use post_votes_shared::types::VoteEvent;
use tracing::{debug, instrument, warn};

pub use crate::errors::LoaderError;

/// `VoteLoader` writes batches of accepted votes to a `VoteLogRepository`.
///
/// Each vote in a batch is written on its own. A failing vote is logged and
/// skipped, never retried.
pub struct VoteLoader {
    pub vote_log: Arc<dyn VoteLogRepository>,
}

impl VoteLoader {
    /// Creates a new `VoteLoader` instance.
    ///
    /// # Arguments
    ///
    /// * `vote_log` - The repository holding one row per (post, user) pair.
    pub fn new(vote_log: Arc<dyn VoteLogRepository>) -> Self {
        Self { vote_log }
    }

    /// Flushes a batch of vote events.
    ///
    /// Retractions delete the stored row, every other vote upserts it.
    ///
    /// # Returns
    ///
    /// The per-vote outcome of the batch, or a `LoaderError` if the batch could
    /// not be attempted at all.
    #[instrument(skip_all, fields(batch_size = events.len()))]
    pub async fn flush(&self, events: &[VoteEvent]) -> Result<BatchOperationSummary, LoaderError> {
        let summary = self.vote_log.persist_votes(events).await?;

        for failure in summary.failures() {
            warn!(
                post_id = failure.post_id,
                user_id = failure.user_id,
                error = failure.error.as_deref().unwrap_or_default(),
                "Failed to persist vote, skipping"
            );
        }
        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Flushed vote batch"
        );
        Ok(summary)
    }

    /// Whether the vote log tables exist.
    pub async fn check_ready(&self) -> Result<bool, LoaderError> {
        Ok(self.vote_log.check_tables_created().await?)
    }
}
