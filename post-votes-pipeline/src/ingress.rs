//! Ingress fast path.
//!
//! Validates a vote against the rule engine, applies it to the ledger and
//! hands the resulting event to the durability pipeline without waiting for
//! it to be written.
use std::sync::Arc;
use std::sync::atomic::Ordering;

use dashmap::DashMap;
use post_votes_shared::types::{PostId, UserId, VoteEvent, VoteValue};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::errors::{VoteError, VoteRejection};
use crate::ledger::{ItemLocks, LedgerStore};
use crate::orchestrator::PipelineStats;
use crate::rules::VotingRules;

/// Best-effort net vote tally per post for read-your-own-write feedback.
///
/// Not authoritative and not persisted.
#[derive(Debug, Default)]
pub struct FeedbackTally {
    counts: DashMap<PostId, i64>,
}

impl FeedbackTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `units` signed vote units to the post.
    pub fn bump(&self, post_id: PostId, units: i64) {
        *self.counts.entry(post_id).or_insert(0) += units;
    }

    pub fn get(&self, post_id: PostId) -> i64 {
        self.counts.get(&post_id).map(|count| *count).unwrap_or(0)
    }
}

/// `VoteIngress` is the request-facing entry point for votes.
///
/// Votes on one post are serialized through `ItemLocks`, so concurrent votes
/// never lose an update. Enqueueing for durability never blocks: a full queue
/// drops the event and counts the drop.
pub struct VoteIngress {
    ledger: Arc<dyn LedgerStore>,
    locks: Arc<ItemLocks>,
    rules: VotingRules,
    events: mpsc::Sender<VoteEvent>,
    stats: Arc<PipelineStats>,
    tally: Option<FeedbackTally>,
}

impl VoteIngress {
    /// Creates a new `VoteIngress` instance.
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger store holding scores and voter ledgers
    /// * `locks` - Per-post locks shared with every other ledger writer
    /// * `rules` - Voting window and score per vote
    /// * `events` - Sending half of the durability queue
    /// * `stats` - Pipeline counters; ingress records dropped events here
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        locks: Arc<ItemLocks>,
        rules: VotingRules,
        events: mpsc::Sender<VoteEvent>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            ledger,
            locks,
            rules,
            events,
            stats,
            tally: None,
        }
    }

    /// Enables the feedback tally.
    pub fn with_feedback_tally(mut self) -> Self {
        self.tally = Some(FeedbackTally::new());
        self
    }

    /// Submits a vote at the current wall-clock time.
    ///
    /// # Returns
    ///
    /// The score delta applied to the post, or why the vote was not accepted.
    pub async fn submit_vote(
        &self,
        user_id: UserId,
        post_id: PostId,
        vote: VoteValue,
    ) -> Result<i64, VoteError> {
        let _guard = self.locks.lock(post_id).await;
        // Clock is read under the lock; archiving depends on it
        let now = chrono::Utc::now().timestamp();
        self.decide_and_apply(user_id, post_id, vote, now).await
    }

    /// Submits a vote as if cast at unix time `now`.
    pub async fn submit_vote_at(
        &self,
        user_id: UserId,
        post_id: PostId,
        vote: VoteValue,
        now: i64,
    ) -> Result<i64, VoteError> {
        let _guard = self.locks.lock(post_id).await;
        self.decide_and_apply(user_id, post_id, vote, now).await
    }

    /// Net vote units recorded by the feedback tally, if enabled.
    pub fn feedback(&self, post_id: PostId) -> Option<i64> {
        self.tally.as_ref().map(|tally| tally.get(post_id))
    }

    async fn decide_and_apply(
        &self,
        user_id: UserId,
        post_id: PostId,
        vote: VoteValue,
        now: i64,
    ) -> Result<i64, VoteError> {
        let created_at = self
            .ledger
            .created_at(post_id)
            .await?
            .ok_or(VoteRejection::NotFound)?;
        let previous = self.ledger.previous_vote(post_id, user_id).await?;

        let score_delta = match self.rules.decide(previous, vote, now - created_at) {
            Ok(delta) => delta,
            Err(reason) => {
                debug!(post_id, user_id, reason = reason.code(), "Vote rejected");
                return Err(reason.into());
            }
        };

        self.ledger.apply_vote(post_id, user_id, vote, score_delta).await?;

        if let Some(tally) = &self.tally {
            tally.bump(post_id, i64::from(vote.as_i8() - previous.as_i8()));
        }
        self.enqueue(VoteEvent {
            post_id,
            user_id,
            vote,
            voted_at: now,
        });

        debug!(post_id, user_id, score_delta, "Vote accepted");
        Ok(score_delta)
    }

    fn enqueue(&self, event: VoteEvent) {
        let reason = match self.events.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => "queue full",
            Err(TrySendError::Closed(_)) => "queue closed",
        };
        let dropped = self.stats.events_dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            post_id = event.post_id,
            user_id = event.user_id,
            dropped,
            reason,
            "Dropped vote event before persistence"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::ledger::MemoryLedgerStore;
    use async_trait::async_trait;
    use post_votes_shared::types::{CommunityId, RankOrder, VotesCount};

    const SPV: i64 = 432;
    const CREATED: i64 = 1_700_000_000;

    async fn setup(capacity: usize) -> (VoteIngress, Arc<MemoryLedgerStore>, mpsc::Receiver<VoteEvent>) {
        let ledger = Arc::new(MemoryLedgerStore::new());
        ledger.init_item(1, 10, CREATED).await.unwrap();
        let (tx, rx) = mpsc::channel(capacity);
        let ingress = VoteIngress::new(
            ledger.clone(),
            Arc::new(ItemLocks::default()),
            VotingRules::default(),
            tx,
            Arc::new(PipelineStats::default()),
        );
        (ingress, ledger, rx)
    }

    #[tokio::test]
    async fn test_accepted_vote_updates_score_and_enqueues() {
        let (ingress, ledger, mut rx) = setup(16).await;

        let delta = ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED + 60).await.unwrap();

        assert_eq!(delta, SPV);
        assert_eq!(ledger.score(1).await.unwrap(), Some(CREATED + SPV));
        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            VoteEvent { post_id: 1, user_id: 7, vote: VoteValue::Up, voted_at: CREATED + 60 }
        );
    }

    #[tokio::test]
    async fn test_unknown_post_is_not_found() {
        let (ingress, _ledger, mut rx) = setup(16).await;

        let err = ingress.submit_vote_at(7, 404, VoteValue::Up, CREATED).await.unwrap_err();

        assert_eq!(err.rejection(), Some(VoteRejection::NotFound));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rejections_leave_no_trace() {
        let (ingress, ledger, mut rx) = setup(16).await;
        ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED + 1).await.unwrap();
        rx.try_recv().unwrap();

        let repeated = ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED + 2).await.unwrap_err();
        assert_eq!(repeated.rejection(), Some(VoteRejection::Repeated));

        let expired = ingress
            .submit_vote_at(8, 1, VoteValue::Up, CREATED + 604_801)
            .await
            .unwrap_err();
        assert_eq!(expired.rejection(), Some(VoteRejection::Expired));

        assert_eq!(ledger.score(1).await.unwrap(), Some(CREATED + SPV));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_drops_but_accepts() {
        let (ingress, ledger, _rx) = setup(1).await;

        ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED).await.unwrap();
        ingress.submit_vote_at(8, 1, VoteValue::Up, CREATED).await.unwrap();

        assert_eq!(ledger.score(1).await.unwrap(), Some(CREATED + 2 * SPV));
        assert_eq!(ingress.stats.events_dropped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_closed_queue_drops_but_accepts() {
        let (ingress, ledger, rx) = setup(4).await;
        drop(rx);

        ingress.submit_vote_at(7, 1, VoteValue::Down, CREATED).await.unwrap();

        assert_eq!(ledger.score(1).await.unwrap(), Some(CREATED - SPV));
        assert_eq!(ingress.stats.events_dropped.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_feedback_tally_tracks_net_units() {
        let (ingress, _ledger, _rx) = setup(16).await;
        assert_eq!(ingress.feedback(1), None);

        let ingress = ingress.with_feedback_tally();
        ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED).await.unwrap();
        ingress.submit_vote_at(8, 1, VoteValue::Up, CREATED).await.unwrap();
        ingress.submit_vote_at(7, 1, VoteValue::Down, CREATED).await.unwrap();

        assert_eq!(ingress.feedback(1), Some(0));
        assert_eq!(ingress.feedback(2), Some(0));
    }

    #[tokio::test]
    async fn test_wall_clock_vote_on_fresh_post() {
        let (ingress, ledger, _rx) = setup(16).await;
        let now = chrono::Utc::now().timestamp();
        ledger.init_item(2, 10, now).await.unwrap();

        assert_eq!(ingress.submit_vote(7, 2, VoteValue::Up).await, Ok(SPV));
    }

    /// Ledger whose writes always fail.
    struct UnavailableLedger {
        inner: MemoryLedgerStore,
    }

    #[async_trait]
    impl LedgerStore for UnavailableLedger {
        async fn init_item(&self, post_id: PostId, community_id: CommunityId, created_at: i64) -> Result<bool, LedgerError> {
            self.inner.init_item(post_id, community_id, created_at).await
        }
        async fn created_at(&self, post_id: PostId) -> Result<Option<i64>, LedgerError> {
            self.inner.created_at(post_id).await
        }
        async fn previous_vote(&self, post_id: PostId, user_id: UserId) -> Result<VoteValue, LedgerError> {
            self.inner.previous_vote(post_id, user_id).await
        }
        async fn apply_vote(&self, _: PostId, _: UserId, _: VoteValue, _: i64) -> Result<(), LedgerError> {
            Err(LedgerError::Unavailable("connection refused".to_string()))
        }
        async fn score(&self, post_id: PostId) -> Result<Option<i64>, LedgerError> {
            self.inner.score(post_id).await
        }
        async fn ranked_ids(&self, community: Option<CommunityId>, order: RankOrder, offset: usize, limit: usize) -> Result<Vec<PostId>, LedgerError> {
            self.inner.ranked_ids(community, order, offset, limit).await
        }
        async fn upvote_counts(&self, post_ids: &[PostId]) -> Result<Vec<i64>, LedgerError> {
            self.inner.upvote_counts(post_ids).await
        }
        async fn vote_totals(&self, post_id: PostId) -> Result<Option<VotesCount>, LedgerError> {
            self.inner.vote_totals(post_id).await
        }
        async fn expired_items(&self, cutoff: i64) -> Result<Vec<PostId>, LedgerError> {
            self.inner.expired_items(cutoff).await
        }
        async fn drop_voters(&self, post_id: PostId) -> Result<bool, LedgerError> {
            self.inner.drop_voters(post_id).await
        }
    }

    #[tokio::test]
    async fn test_ledger_failure_is_transient_and_not_enqueued() {
        let ledger = Arc::new(UnavailableLedger { inner: MemoryLedgerStore::new() });
        ledger.init_item(1, 10, CREATED).await.unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let ingress = VoteIngress::new(
            ledger.clone(),
            Arc::new(ItemLocks::default()),
            VotingRules::default(),
            tx,
            Arc::new(PipelineStats::default()),
        )
        .with_feedback_tally();

        let err = ingress.submit_vote_at(7, 1, VoteValue::Up, CREATED).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(ledger.score(1).await.unwrap(), Some(CREATED));
        assert_eq!(ledger.previous_vote(1, 7).await.unwrap(), VoteValue::Remove);
        assert_eq!(ingress.feedback(1), Some(0));
        assert!(rx.try_recv().is_err());
    }
}
