//! In-memory stand-ins for the repository traits.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use post_votes_pipeline::ledger::{ItemLocks, LedgerStore, MemoryLedgerStore};
use post_votes_pipeline::orchestrator::PipelineStats;
use post_votes_pipeline::ingress::VoteIngress;
use post_votes_pipeline::rules::VotingRules;
use post_votes_repository::{
    BatchOperationSummary, PostCatalog, PostCatalogError, VoteLogError, VoteLogRepository,
};
use post_votes_shared::types::{
    PostId, PostRecord, StoredVote, UserId, VoteEvent, VoteValue, VotesCount,
};
use tokio::sync::mpsc;

/// Vote log keeping rows in a map and recording the size of every batch.
#[derive(Default)]
pub struct MockVoteLog {
    pub rows: Mutex<HashMap<(PostId, UserId), StoredVote>>,
    pub batches: Mutex<Vec<usize>>,
    pub totals: Mutex<Vec<VotesCount>>,
    /// Posts whose writes fail.
    pub failing_posts: Mutex<HashSet<PostId>>,
    pub fail_totals: Mutex<bool>,
}

impl MockVoteLog {
    pub fn with_rows(rows: &[(PostId, UserId, VoteValue)]) -> Self {
        let log = Self::default();
        for &(post_id, user_id, vote) in rows {
            log.rows.lock().insert(
                (post_id, user_id),
                StoredVote { post_id, user_id, vote, updated_at: 0 },
            );
        }
        log
    }

    pub fn stored(&self, post_id: PostId, user_id: UserId) -> Option<VoteValue> {
        self.rows.lock().get(&(post_id, user_id)).map(|row| row.vote)
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl VoteLogRepository for MockVoteLog {
    async fn upsert_vote(&self, event: &VoteEvent) -> Result<(), VoteLogError> {
        if self.failing_posts.lock().contains(&event.post_id) {
            return Err(VoteLogError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        self.rows.lock().insert(
            (event.post_id, event.user_id),
            StoredVote {
                post_id: event.post_id,
                user_id: event.user_id,
                vote: event.vote,
                updated_at: event.voted_at,
            },
        );
        Ok(())
    }

    async fn delete_vote(&self, post_id: PostId, user_id: UserId) -> Result<(), VoteLogError> {
        if self.failing_posts.lock().contains(&post_id) {
            return Err(VoteLogError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        self.rows.lock().remove(&(post_id, user_id));
        Ok(())
    }

    async fn persist_votes(&self, events: &[VoteEvent]) -> Result<BatchOperationSummary, VoteLogError> {
        self.batches.lock().push(events.len());
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

    async fn get_votes(&self) -> Result<Vec<StoredVote>, VoteLogError> {
        let mut votes: Vec<StoredVote> = self.rows.lock().values().copied().collect();
        votes.sort_by_key(|vote| (vote.post_id, vote.user_id));
        Ok(votes)
    }

    async fn save_vote_totals(&self, totals: &[VotesCount]) -> Result<(), VoteLogError> {
        if *self.fail_totals.lock() {
            return Err(VoteLogError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        self.totals.lock().extend_from_slice(totals);
        Ok(())
    }

    async fn check_tables_created(&self) -> Result<bool, VoteLogError> {
        Ok(true)
    }
}

pub struct MockCatalog {
    pub posts: Vec<PostRecord>,
}

#[async_trait]
impl PostCatalog for MockCatalog {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, PostCatalogError> {
        Ok(self.posts.clone())
    }
}

/// Ledger, ingress and queue receiver wired the way the service wires them.
pub struct Harness {
    pub ledger: Arc<MemoryLedgerStore>,
    pub locks: Arc<ItemLocks>,
    pub stats: Arc<PipelineStats>,
    pub ingress: Arc<VoteIngress>,
    pub receiver: mpsc::Receiver<VoteEvent>,
}

pub async fn harness(posts: &[(PostId, i64)], capacity: usize) -> Harness {
    let ledger = Arc::new(MemoryLedgerStore::new());
    for &(post_id, created_at) in posts {
        ledger.init_item(post_id, 1, created_at).await.unwrap();
    }
    let locks = Arc::new(ItemLocks::default());
    let stats = Arc::new(PipelineStats::default());
    let (sender, receiver) = mpsc::channel(capacity);
    let ingress = Arc::new(VoteIngress::new(
        ledger.clone(),
        locks.clone(),
        VotingRules::default(),
        sender,
        stats.clone(),
    ));
    Harness { ledger, locks, stats, ingress, receiver }
}
