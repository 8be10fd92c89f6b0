//! This module defines the `VoteLogRepository` trait, which provides an interface
//! for interacting with the durable vote log and the archived vote totals.
//! It abstracts the database operations for persistence and retrieval.
use post_votes_shared::types::{PostId, StoredVote, UserId, VoteEvent, VotesCount};
use crate::errors::VoteLogError;
use crate::types::BatchOperationSummary;

/// A trait that defines the interface for interacting with the durable vote log.
///
/// The log holds one row per (post, user) pair with the current signed vote value.
/// Writes are idempotent per key, so events may be applied in any relative order.
#[async_trait::async_trait]
pub trait VoteLogRepository: Send + Sync {
    /// Inserts or overwrites the vote of `event.user_id` on `event.post_id`.
    ///
    /// # Arguments
    ///
    /// * `event` - The accepted vote; must not be a `Remove` event.
    ///
    /// # Returns
    ///
    /// A `Result` indicating success or a `VoteLogError` if the write fails.
    async fn upsert_vote(&self, event: &VoteEvent) -> Result<(), VoteLogError>;

    /// Deletes the vote row for the given (post, user) pair, if any.
    async fn delete_vote(&self, post_id: PostId, user_id: UserId) -> Result<(), VoteLogError>;

    /// Writes a batch of vote events one by one.
    ///
    /// `Remove` events delete the row, every other event upserts it. A failing event is
    /// recorded in the summary and does not stop the rest of the batch.
    ///
    /// # Arguments
    ///
    /// * `events` - Vote events in arrival order
    ///
    /// # Returns
    ///
    /// A `BatchOperationSummary` with one result per event. An `Err` is reserved for
    /// failures that prevent the batch from being attempted at all.
    async fn persist_votes(&self, events: &[VoteEvent]) -> Result<BatchOperationSummary, VoteLogError> {
        let mut summary = BatchOperationSummary::default();
        for event in events {
            let result = if event.vote.is_remove() {
                self.delete_vote(event.post_id, event.user_id).await
            } else {
                self.upsert_vote(event).await
            };
            summary.record(event.post_id, event.user_id, result.err().map(|e| e.to_string()));
        }
        Ok(summary)
    }

    /// Retrieves every stored vote.
    ///
    /// Used to rebuild the ranking ledger at start-up.
    async fn get_votes(&self) -> Result<Vec<StoredVote>, VoteLogError>;

    /// Upserts the archived vote totals of posts whose voting window has closed.
    async fn save_vote_totals(&self, totals: &[VotesCount]) -> Result<(), VoteLogError>;

    /// Checks whether the vote log tables exist.
    async fn check_tables_created(&self) -> Result<bool, VoteLogError>;
}
