use post_votes_shared::types::VoteEvent;

/// Accumulates vote events until a size threshold is reached.
#[derive(Debug)]
pub struct Batcher {
    pending: Vec<VoteEvent>,
    batch_size: usize,
}

impl Batcher {
    /// Creates a batcher that releases batches of `batch_size` events (at least one).
    pub fn new(batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            pending: Vec::with_capacity(batch_size),
            batch_size,
        }
    }

    /// Adds an event, returning a full batch once the threshold is reached.
    pub fn push(&mut self, event: VoteEvent) -> Option<Vec<VoteEvent>> {
        self.pending.push(event);
        if self.pending.len() >= self.batch_size {
            Some(std::mem::replace(
                &mut self.pending,
                Vec::with_capacity(self.batch_size),
            ))
        } else {
            None
        }
    }

    /// Takes whatever is pending, `None` if nothing is.
    pub fn take(&mut self) -> Option<Vec<VoteEvent>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
