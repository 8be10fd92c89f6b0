use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the vote a user holds (or requests) on a post.
///
/// `Remove` doubles as "no standing vote": a user absent from a post's voter
/// ledger reads back as `Remove`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteValue {
    /// Indicates an upvote or positive endorsement.
    Up,
    /// Indicates a downvote or negative endorsement.
    Down,
    /// Indicates the removal or retraction of a previous vote.
    Remove,
}

impl VoteValue {
    /// Signed value of the vote: `1`, `-1` or `0`.
    pub fn as_i8(self) -> i8 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
            VoteValue::Remove => 0,
        }
    }

    pub fn is_remove(self) -> bool {
        self == VoteValue::Remove
    }
}

/// Raised when a signed vote direction is outside `{-1, 0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidVoteValue(pub i64);

impl fmt::Display for InvalidVoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid vote direction {}", self.0)
    }
}

impl std::error::Error for InvalidVoteValue {}

impl TryFrom<i64> for VoteValue {
    type Error = InvalidVoteValue;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Remove),
            other => Err(InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i16 {
    fn from(value: VoteValue) -> Self {
        value.as_i8() as i16
    }
}
