use serde::{Deserialize, Serialize};
use crate::types::PostId;

/// Represents the aggregated vote counts for a post.
///
/// Written to the durable store when a post leaves its voting window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VotesCount {
    pub post_id: PostId,
    pub upvotes: i64,
    pub downvotes: i64,
}
