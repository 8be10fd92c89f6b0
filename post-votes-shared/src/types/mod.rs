mod ids;
mod post_record;
mod rank_order;
mod stored_vote;
mod vote_event;
mod vote_value;
mod votes_count;

pub use ids::{CommunityId, PostId, UserId};
pub use post_record::PostRecord;
pub use rank_order::RankOrder;
pub use stored_vote::StoredVote;
pub use vote_event::VoteEvent;
pub use vote_value::{InvalidVoteValue, VoteValue};
pub use votes_count::VotesCount;
