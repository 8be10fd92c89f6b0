use serde::{Deserialize, Serialize};
use crate::types::{CommunityId, PostId};

/// The slice of post metadata the ranking ledger needs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostRecord {
    pub post_id: PostId,
    pub community_id: CommunityId,
    /// Unix timestamp (seconds) of creation.
    pub created_at: i64,
}
