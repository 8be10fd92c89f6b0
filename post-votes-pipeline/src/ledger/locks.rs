use post_votes_shared::types::PostId;
use tokio::sync::{Mutex, MutexGuard};

/// Sharded per-post mutual exclusion.
///
/// Votes on the same post serialize on one shard; votes on posts hashed to
/// different shards proceed in parallel.
#[derive(Debug)]
pub struct ItemLocks {
    shards: Vec<Mutex<()>>,
}

impl ItemLocks {
    pub const DEFAULT_SHARDS: usize = 256;

    /// Creates a lock table with `shards` shards (at least one).
    pub fn new(shards: usize) -> Self {
        let shards = (0..shards.max(1)).map(|_| Mutex::new(())).collect();
        Self { shards }
    }

    /// Waits for exclusive access to `post_id`.
    pub async fn lock(&self, post_id: PostId) -> MutexGuard<'_, ()> {
        self.shards[self.shard_for(post_id)].lock().await
    }

    fn shard_for(&self, post_id: PostId) -> usize {
        (post_id as u64 % self.shards.len() as u64) as usize
    }
}

impl Default for ItemLocks {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SHARDS)
    }
}
