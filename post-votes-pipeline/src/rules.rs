//! Vote rule engine.
//!
//! Decides whether a requested vote transition is legal for a post of a given
//! age and computes the score delta it applies to the ledger. Pure logic, no
//! store access.
use post_votes_shared::types::VoteValue;
use crate::errors::VoteRejection;

/// One week, the default voting window.
pub const DEFAULT_VOTING_WINDOW_SECS: i64 = 7 * 24 * 3600;

/// Score granted per vote unit: 200 votes buy one day of recency.
pub const DEFAULT_SCORE_PER_VOTE: i64 = 86_400 / 200;

/// Upper bound accepted for `score_per_vote`: one vote buys at most a year.
pub const MAX_SCORE_PER_VOTE: i64 = 365 * 86_400;

/// Tunable constants of the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VotingRules {
    /// Seconds after creation during which a post accepts votes.
    pub voting_window_secs: i64,
    /// Score added or removed per unit of vote change, at most
    /// `MAX_SCORE_PER_VOTE`.
    pub score_per_vote: i64,
}

impl Default for VotingRules {
    fn default() -> Self {
        Self {
            voting_window_secs: DEFAULT_VOTING_WINDOW_SECS,
            score_per_vote: DEFAULT_SCORE_PER_VOTE,
        }
    }
}

impl VotingRules {
    /// Whether a post of this age no longer accepts votes.
    pub fn is_expired(&self, age_secs: i64) -> bool {
        age_secs > self.voting_window_secs
    }

    /// Decides a vote transition.
    ///
    /// # Arguments
    ///
    /// * `previous` - The user's standing vote, `Remove` if none
    /// * `requested` - The vote the user asks for
    /// * `age_secs` - Seconds elapsed since the post was created
    ///
    /// # Returns
    ///
    /// The signed score delta to apply, or the reason the vote is refused.
    /// Expiry is checked before duplicate suppression.
    pub fn decide(
        &self,
        previous: VoteValue,
        requested: VoteValue,
        age_secs: i64,
    ) -> Result<i64, VoteRejection> {
        if self.is_expired(age_secs) {
            return Err(VoteRejection::Expired);
        }
        if requested == previous {
            return Err(VoteRejection::Repeated);
        }

        let previous = i64::from(previous.as_i8());
        let requested = i64::from(requested.as_i8());
        let direction = if requested > previous { 1 } else { -1 };
        let magnitude = (requested - previous).abs();
        Ok(direction * magnitude * self.score_per_vote)
    }

    /// Delta of a stored vote replayed over `previous` during reconciliation.
    ///
    /// Replays ignore the voting window: the vote was legal when it was cast.
    pub fn replay_delta(&self, previous: VoteValue, vote: VoteValue) -> i64 {
        (i64::from(vote.as_i8()) - i64::from(previous.as_i8())) * self.score_per_vote
    }
}
