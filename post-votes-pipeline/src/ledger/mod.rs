//! This module defines the `LedgerStore` trait, the live vote ledger that the
//! ranking reads and the ingress mutates.
//!
//! The ledger holds, per post, its creation time, its score, and the voter
//! ledger mapping each user to their standing vote. Per-post atomicity of
//! `apply_vote` is the store's job; serializing the read-modify-write of
//! `previous_vote` + `apply_vote` is done by callers through `ItemLocks`.
mod locks;
mod memory;

pub use locks::ItemLocks;
pub use memory::MemoryLedgerStore;

use async_trait::async_trait;
use post_votes_shared::types::{CommunityId, PostId, RankOrder, UserId, VoteValue, VotesCount};
use crate::errors::LedgerError;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Registers a new post with score equal to its creation time and adds it to
    /// its community.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the post was created, `Ok(false)` if it was already known.
    async fn init_item(
        &self,
        post_id: PostId,
        community_id: CommunityId,
        created_at: i64,
    ) -> Result<bool, LedgerError>;

    /// Creation time of a post, `None` if the ledger does not know it.
    async fn created_at(&self, post_id: PostId) -> Result<Option<i64>, LedgerError>;

    /// The user's standing vote on the post. Absence reads as `Remove`.
    async fn previous_vote(&self, post_id: PostId, user_id: UserId) -> Result<VoteValue, LedgerError>;

    /// Adjusts the post score by `score_delta` and records `requested` in the voter
    /// ledger, removing the entry when `requested` is `Remove`.
    ///
    /// Both changes apply together or not at all.
    async fn apply_vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        requested: VoteValue,
        score_delta: i64,
    ) -> Result<(), LedgerError>;

    /// Current score of a post.
    async fn score(&self, post_id: PostId) -> Result<Option<i64>, LedgerError>;

    /// Post IDs in descending order of `order`, optionally restricted to one
    /// community, windowed by `offset` and `limit`.
    async fn ranked_ids(
        &self,
        community: Option<CommunityId>,
        order: RankOrder,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PostId>, LedgerError>;

    /// Number of upvotes of each post, in input order. Unknown posts count 0.
    async fn upvote_counts(&self, post_ids: &[PostId]) -> Result<Vec<i64>, LedgerError>;

    /// Upvote and downvote totals of a post.
    async fn vote_totals(&self, post_id: PostId) -> Result<Option<VotesCount>, LedgerError>;

    /// Posts created before `cutoff` whose voter ledger is still held.
    async fn expired_items(&self, cutoff: i64) -> Result<Vec<PostId>, LedgerError>;

    /// Replaces the voter ledger of a post with its totals.
    ///
    /// Score and timeline entries are kept, so ranking is unaffected.
    async fn drop_voters(&self, post_id: PostId) -> Result<bool, LedgerError>;
}
