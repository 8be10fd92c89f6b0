use serde::{Deserialize, Serialize};
use crate::types::{PostId, UserId, VoteValue};

/// A row of the durable vote log: the current vote of one user on one post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredVote {
    pub post_id: PostId,
    pub user_id: UserId,
    pub vote: VoteValue,
    pub updated_at: i64,
}
