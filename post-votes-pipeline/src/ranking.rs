//! Ranking query.
//!
//! Read-only view over the ledger producing ordered post ID pages for the
//! post listing. Reads never coordinate with the durability pipeline and see
//! the latest applied score of each post.
use std::sync::Arc;

use post_votes_shared::types::{CommunityId, PostId, RankOrder};
use tracing::debug;

use crate::errors::LedgerError;
use crate::ledger::LedgerStore;

/// A window over a ranked post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankQuery {
    /// Restricts the listing to one community.
    pub community: Option<CommunityId>,
    pub order: RankOrder,
    pub offset: usize,
    pub limit: usize,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            community: None,
            order: RankOrder::Time,
            offset: 0,
            limit: 10,
        }
    }
}

impl RankQuery {
    /// Builds a query from 1-based page parameters. Page 0 reads as page 1.
    pub fn page(page: usize, size: usize) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(size),
            limit: size,
            ..Self::default()
        }
    }

    pub fn ordered_by(mut self, order: RankOrder) -> Self {
        self.order = order;
        self
    }

    pub fn in_community(mut self, community_id: CommunityId) -> Self {
        self.community = Some(community_id);
        self
    }
}

/// `RankingQuery` serves ranked post IDs and vote counts from the ledger.
#[derive(Clone)]
pub struct RankingQuery {
    ledger: Arc<dyn LedgerStore>,
}

impl RankingQuery {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Post IDs of the requested window, best ranked first.
    pub async fn ranked_item_ids(&self, query: &RankQuery) -> Result<Vec<PostId>, LedgerError> {
        let ids = self
            .ledger
            .ranked_ids(query.community, query.order, query.offset, query.limit)
            .await?;
        debug!(
            community_id = ?query.community,
            order = ?query.order,
            offset = query.offset,
            returned = ids.len(),
            "Ranked post listing"
        );
        Ok(ids)
    }

    /// Upvote count of each post, aligned with `post_ids`.
    pub async fn upvote_counts(&self, post_ids: &[PostId]) -> Result<Vec<i64>, LedgerError> {
        self.ledger.upvote_counts(post_ids).await
    }
}
