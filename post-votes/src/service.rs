//! `VotingService`, the facade the request layer calls into.

use std::sync::Arc;

use post_votes_pipeline::errors::{LedgerError, VoteError};
use post_votes_pipeline::ingress::VoteIngress;
use post_votes_pipeline::ledger::LedgerStore;
use post_votes_pipeline::ranking::{RankQuery, RankingQuery};
use post_votes_shared::types::{CommunityId, PostId, UserId, VoteValue};
use tracing::info;

/// Entry points of the voting subsystem exposed to its collaborators.
///
/// Cheap to clone; every clone shares the same ledger and queue.
#[derive(Clone)]
pub struct VotingService {
    ingress: Arc<VoteIngress>,
    ranking: RankingQuery,
    ledger: Arc<dyn LedgerStore>,
}

impl VotingService {
    pub fn new(ingress: Arc<VoteIngress>, ranking: RankingQuery, ledger: Arc<dyn LedgerStore>) -> Self {
        Self {
            ingress,
            ranking,
            ledger,
        }
    }

    /// Casts, flips or retracts the vote of `user_id` on `post_id`.
    ///
    /// Returns as soon as the ledger is updated; persistence happens in the
    /// background.
    pub async fn submit_vote(
        &self,
        user_id: UserId,
        post_id: PostId,
        vote: VoteValue,
    ) -> Result<i64, VoteError> {
        self.ingress.submit_vote(user_id, post_id, vote).await
    }

    /// Ordered post IDs for a listing page.
    pub async fn ranked_item_ids(&self, query: &RankQuery) -> Result<Vec<PostId>, LedgerError> {
        self.ranking.ranked_item_ids(query).await
    }

    /// Upvote count of each post, aligned with `post_ids`.
    pub async fn upvote_counts(&self, post_ids: &[PostId]) -> Result<Vec<i64>, LedgerError> {
        self.ranking.upvote_counts(post_ids).await
    }

    /// Registers a newly created post. Called once by the post creation flow.
    pub async fn init_item(
        &self,
        post_id: PostId,
        community_id: CommunityId,
        created_at: i64,
    ) -> Result<bool, LedgerError> {
        let created = self.ledger.init_item(post_id, community_id, created_at).await?;
        if created {
            info!(post_id, community_id, "Post registered for voting");
        }
        Ok(created)
    }

    /// Net vote units seen by the feedback tally, if enabled.
    pub fn feedback(&self, post_id: PostId) -> Option<i64> {
        self.ingress.feedback(post_id)
    }
}
