use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the ingress and the durability worker.
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Events taken off the queue by the worker.
    pub events_received: AtomicU64,
    /// Events written to the vote log.
    pub events_flushed: AtomicU64,
    /// Events the vote log refused.
    pub events_failed: AtomicU64,
    pub batches_flushed: AtomicU64,
    /// Events dropped by the ingress before reaching the queue.
    pub events_dropped: AtomicU64,
}

/// Point-in-time copy of `PipelineStats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStatsSnapshot {
    pub events_received: u64,
    pub events_flushed: u64,
    pub events_failed: u64,
    pub batches_flushed: u64,
    pub events_dropped: u64,
}

impl PipelineStats {
    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            events_received: self.events_received.load(Ordering::Relaxed),
            events_flushed: self.events_flushed.load(Ordering::Relaxed),
            events_failed: self.events_failed.load(Ordering::Relaxed),
            batches_flushed: self.batches_flushed.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}
