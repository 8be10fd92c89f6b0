use serde::{Deserialize, Serialize};
use crate::types::{PostId, UserId, VoteValue};

/// A vote accepted by the ledger, queued for the durable vote log.
///
/// A `Remove` event deletes the (post, user) row instead of upserting it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteEvent {
    pub post_id: PostId,
    pub user_id: UserId,
    pub vote: VoteValue,
    /// Unix timestamp (seconds) at which the vote was accepted.
    pub voted_at: i64,
}
