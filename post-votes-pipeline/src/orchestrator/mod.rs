//! Durability pipeline.
//!
//! A single background worker drains the bounded vote queue, batches events,
//! and flushes a batch to the vote log when it reaches the size threshold or
//! when the flush timer fires, whichever comes first. On shutdown the queue
//! is closed, drained, and the remainder flushed before the worker returns.
mod batcher;
mod stats;

pub use batcher::Batcher;
pub use stats::{PipelineStats, PipelineStatsSnapshot};

use std::sync::Arc;
use std::sync::atomic::Ordering;

use post_votes_shared::types::VoteEvent;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::{error, info, instrument};

use crate::errors::OrchestratorError;
use crate::loader::VoteLoader;

/// Configuration for the durability pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Capacity of the bounded vote queue.
    pub queue_capacity: usize,
    /// Number of events that triggers a flush.
    pub batch_size: usize,
    /// Period of the flush timer.
    pub flush_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
            batch_size: 100,
            flush_interval: Duration::from_secs(5),
        }
    }
}

impl PipelineConfig {
    /// Creates the bounded vote queue.
    pub fn channel(&self) -> (mpsc::Sender<VoteEvent>, mpsc::Receiver<VoteEvent>) {
        mpsc::channel(self.queue_capacity.max(1))
    }
}

/// `DurabilityWorker` batches queued vote events into the vote log.
pub struct DurabilityWorker {
    loader: VoteLoader,
    config: PipelineConfig,
    receiver: mpsc::Receiver<VoteEvent>,
    shutdown_rx: broadcast::Receiver<()>,
    stats: Arc<PipelineStats>,
}

impl DurabilityWorker {
    /// Creates a new `DurabilityWorker`.
    ///
    /// # Arguments
    ///
    /// * `loader` - Writes batches to the vote log
    /// * `config` - Batch size and flush interval
    /// * `receiver` - Receiving half of the vote queue
    /// * `shutdown_rx` - Fires once when the worker must drain and stop
    /// * `stats` - Counters shared with the ingress
    pub fn new(
        loader: VoteLoader,
        config: PipelineConfig,
        receiver: mpsc::Receiver<VoteEvent>,
        shutdown_rx: broadcast::Receiver<()>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            loader,
            config,
            receiver,
            shutdown_rx,
            stats,
        }
    }

    /// Runs the worker until shutdown or until every queue sender is gone.
    ///
    /// # Returns
    ///
    /// The final pipeline counters, or an `OrchestratorError` if the vote log is
    /// not ready when the worker starts.
    #[instrument(skip_all, name = "durability_worker")]
    pub async fn run(mut self) -> Result<PipelineStatsSnapshot, OrchestratorError> {
        if !self.loader.check_ready().await? {
            return Err(OrchestratorError::TablesMissing);
        }

        info!(
            batch_size = self.config.batch_size,
            flush_interval_secs = self.config.flush_interval.as_secs(),
            "Starting durability worker"
        );

        let period = self.config.flush_interval;
        let mut flush_timer = interval_at(Instant::now() + period, period);
        flush_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut batcher = Batcher::new(self.config.batch_size);

        loop {
            tokio::select! {
                event = self.receiver.recv() => {
                    match event {
                        Some(event) => {
                            self.stats.events_received.fetch_add(1, Ordering::Relaxed);
                            if let Some(batch) = batcher.push(event) {
                                self.flush(batch).await;
                            }
                        }
                        None => {
                            info!("Vote queue closed by all senders");
                            break;
                        }
                    }
                }
                _ = flush_timer.tick() => {
                    if let Some(batch) = batcher.take() {
                        self.flush(batch).await;
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        // Stop accepting, then drain what is already queued
        self.receiver.close();
        while let Some(event) = self.receiver.recv().await {
            self.stats.events_received.fetch_add(1, Ordering::Relaxed);
            if let Some(batch) = batcher.push(event) {
                self.flush(batch).await;
            }
        }
        if let Some(batch) = batcher.take() {
            self.flush(batch).await;
        }

        let stats = self.stats.snapshot();
        info!(
            events_received = stats.events_received,
            events_flushed = stats.events_flushed,
            events_failed = stats.events_failed,
            events_dropped = stats.events_dropped,
            "Durability worker shutdown complete"
        );
        Ok(stats)
    }

    async fn flush(&self, batch: Vec<VoteEvent>) {
        match self.loader.flush(&batch).await {
            Ok(summary) => {
                self.stats.events_flushed.fetch_add(summary.succeeded as u64, Ordering::Relaxed);
                self.stats.events_failed.fetch_add(summary.failed as u64, Ordering::Relaxed);
            }
            Err(e) => {
                error!(error = %e, batch_size = batch.len(), "Failed to flush vote batch");
                self.stats.events_failed.fetch_add(batch.len() as u64, Ordering::Relaxed);
            }
        }
        self.stats.batches_flushed.fetch_add(1, Ordering::Relaxed);

        let stats = self.stats.snapshot();
        info!(
            batch_size = batch.len(),
            events_flushed = stats.events_flushed,
            events_failed = stats.events_failed,
            events_dropped = stats.events_dropped,
            "Vote batch flushed"
        );
    }
}
