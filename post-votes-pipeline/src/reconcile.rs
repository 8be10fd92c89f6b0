//! Ledger reconciliation and expiry archiving.
//!
//! On start-up the live ledger is rebuilt from the post catalog and the
//! durable vote log: every post starts at score = creation time and each
//! stored vote is replayed as a fresh transition. Votes accepted but not yet
//! flushed before a crash are not recoverable.
//!
//! Once a post's voting window has closed, its totals are written to the vote
//! log and its voter ledger is released from memory.
use std::collections::HashSet;
use std::sync::Arc;

use post_votes_repository::{PostCatalog, VoteLogRepository};
use post_votes_shared::types::{PostId, VotesCount};
use tokio::sync::broadcast;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{error, info, instrument, warn};

use crate::errors::ReconcileError;
use crate::ledger::{ItemLocks, LedgerStore};
use crate::rules::VotingRules;

/// Outcome of a ledger rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Posts registered in the ledger.
    pub posts: usize,
    /// Stored votes replayed.
    pub votes: usize,
    /// Stored votes whose post is unknown to the catalog.
    pub skipped_votes: usize,
    /// Stored votes on posts that were already live, left to the ledger.
    pub retained_votes: usize,
}

pub struct Reconciler {
    ledger: Arc<dyn LedgerStore>,
    locks: Arc<ItemLocks>,
    vote_log: Arc<dyn VoteLogRepository>,
    rules: VotingRules,
}

impl Reconciler {
    /// Creates a new `Reconciler`.
    ///
    /// `locks` must be the same lock table the ingress uses.
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        locks: Arc<ItemLocks>,
        vote_log: Arc<dyn VoteLogRepository>,
        rules: VotingRules,
    ) -> Self {
        Self {
            ledger,
            locks,
            vote_log,
            rules,
        }
    }

    /// Rebuilds the ledger from the post catalog and the vote log.
    ///
    /// Replayed votes ignore the voting window. Only posts registered by this
    /// rebuild receive stored votes; posts already in the ledger keep their
    /// live score and voter ledger, so running a rebuild twice is a no-op.
    #[instrument(skip_all)]
    pub async fn rebuild(&self, catalog: &dyn PostCatalog) -> Result<ReconcileSummary, ReconcileError> {
        let mut summary = ReconcileSummary::default();
        let mut registered: HashSet<PostId> = HashSet::new();

        for post in catalog.list_posts().await? {
            if self
                .ledger
                .init_item(post.post_id, post.community_id, post.created_at)
                .await?
            {
                registered.insert(post.post_id);
            }
        }
        summary.posts = registered.len();

        for stored in self.vote_log.get_votes().await? {
            if !registered.contains(&stored.post_id) {
                if self.ledger.created_at(stored.post_id).await?.is_some() {
                    summary.retained_votes += 1;
                } else {
                    warn!(
                        post_id = stored.post_id,
                        user_id = stored.user_id,
                        "Stored vote references an unknown post, skipping"
                    );
                    summary.skipped_votes += 1;
                }
                continue;
            }

            let _guard = self.locks.lock(stored.post_id).await;
            let previous = self.ledger.previous_vote(stored.post_id, stored.user_id).await?;
            if previous == stored.vote {
                continue;
            }
            self.ledger
                .apply_vote(
                    stored.post_id,
                    stored.user_id,
                    stored.vote,
                    self.rules.replay_delta(previous, stored.vote),
                )
                .await?;
            summary.votes += 1;
        }

        info!(
            posts = summary.posts,
            votes = summary.votes,
            skipped_votes = summary.skipped_votes,
            retained_votes = summary.retained_votes,
            "Ledger rebuilt from vote log"
        );
        Ok(summary)
    }

    /// Archives every post whose voting window closed before `now`.
    ///
    /// Totals are saved before any voter ledger is released, so a failed save
    /// leaves the posts to the next sweep.
    ///
    /// # Returns
    ///
    /// The number of posts archived.
    #[instrument(skip(self))]
    pub async fn archive_expired(&self, now: i64) -> Result<usize, ReconcileError> {
        let cutoff = now - self.rules.voting_window_secs;
        let expired = self.ledger.expired_items(cutoff).await?;
        if expired.is_empty() {
            return Ok(0);
        }

        let mut totals: Vec<VotesCount> = Vec::with_capacity(expired.len());
        for &post_id in &expired {
            let _guard = self.locks.lock(post_id).await;
            if let Some(count) = self.ledger.vote_totals(post_id).await? {
                totals.push(count);
            }
        }

        self.vote_log.save_vote_totals(&totals).await?;

        let mut archived = 0;
        for &post_id in &expired {
            let _guard = self.locks.lock(post_id).await;
            if self.ledger.drop_voters(post_id).await? {
                archived += 1;
            }
        }

        info!(archived, "Archived expired posts");
        Ok(archived)
    }

    /// Runs `archive_expired` every `period` until shutdown.
    ///
    /// The first sweep runs immediately. A failed sweep is logged and retried on
    /// the next tick.
    pub async fn run_archive_sweeper(&self, period: Duration, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut sweep_timer = interval(period);
        sweep_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = sweep_timer.tick() => {
                    let now = chrono::Utc::now().timestamp();
                    if let Err(e) = self.archive_expired(now).await {
                        error!(error = %e, "Archive sweep failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Archive sweeper stopped");
                    break;
                }
            }
        }
    }
}
