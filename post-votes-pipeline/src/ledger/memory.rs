//! In-memory ledger store.
//!
//! Post entries live in a `DashMap` so lookups on different posts never
//! contend. The global and per-community score and timeline orderings live
//! together behind one `RwLock`, which is only taken after a post entry, so
//! readers of a ranking never see a score change half applied.
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use post_votes_shared::types::{CommunityId, PostId, RankOrder, UserId, VoteValue, VotesCount};
use tracing::debug;

use super::LedgerStore;
use crate::errors::LedgerError;

#[derive(Debug)]
enum Voters {
    Live(HashMap<UserId, VoteValue>),
    Archived(VotesCount),
}

#[derive(Debug)]
struct PostEntry {
    community_id: CommunityId,
    created_at: i64,
    score: i64,
    voters: Voters,
}

/// Time and score orderings of one set of posts, ascending.
#[derive(Debug, Default)]
struct RankIndex {
    by_time: BTreeSet<(i64, PostId)>,
    by_score: BTreeSet<(i64, PostId)>,
}

impl RankIndex {
    fn insert(&mut self, post_id: PostId, created_at: i64) {
        self.by_time.insert((created_at, post_id));
        self.by_score.insert((created_at, post_id));
    }

    fn rescore(&mut self, post_id: PostId, old_score: i64, new_score: i64) {
        self.by_score.remove(&(old_score, post_id));
        self.by_score.insert((new_score, post_id));
    }

    fn page(&self, order: RankOrder, offset: usize, limit: usize) -> Vec<PostId> {
        let index = match order {
            RankOrder::Time => &self.by_time,
            RankOrder::Score => &self.by_score,
        };
        index
            .iter()
            .rev()
            .map(|&(_, post_id)| post_id)
            .skip(offset)
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Default)]
struct RankIndexes {
    global: RankIndex,
    communities: HashMap<CommunityId, RankIndex>,
}

/// Process-local `LedgerStore`.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    posts: DashMap<PostId, PostEntry>,
    indexes: RwLock<RankIndexes>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts held.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

fn count_votes(post_id: PostId, voters: &HashMap<UserId, VoteValue>) -> VotesCount {
    let mut count = VotesCount { post_id, upvotes: 0, downvotes: 0 };
    for vote in voters.values() {
        match vote {
            VoteValue::Up => count.upvotes += 1,
            VoteValue::Down => count.downvotes += 1,
            VoteValue::Remove => {}
        }
    }
    count
}

fn missing(post_id: PostId) -> LedgerError {
    LedgerError::Unavailable(format!("post {post_id} is not in the ledger"))
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn init_item(
        &self,
        post_id: PostId,
        community_id: CommunityId,
        created_at: i64,
    ) -> Result<bool, LedgerError> {
        match self.posts.entry(post_id) {
            Entry::Occupied(_) => {
                debug!(post_id, "Post already in ledger");
                Ok(false)
            }
            Entry::Vacant(slot) => {
                {
                    let mut indexes = self.indexes.write();
                    indexes.global.insert(post_id, created_at);
                    indexes
                        .communities
                        .entry(community_id)
                        .or_default()
                        .insert(post_id, created_at);
                }
                slot.insert(PostEntry {
                    community_id,
                    created_at,
                    score: created_at,
                    voters: Voters::Live(HashMap::new()),
                });
                Ok(true)
            }
        }
    }

    async fn created_at(&self, post_id: PostId) -> Result<Option<i64>, LedgerError> {
        Ok(self.posts.get(&post_id).map(|entry| entry.created_at))
    }

    async fn previous_vote(&self, post_id: PostId, user_id: UserId) -> Result<VoteValue, LedgerError> {
        let vote = self.posts.get(&post_id).and_then(|entry| match &entry.voters {
            Voters::Live(voters) => voters.get(&user_id).copied(),
            Voters::Archived(_) => None,
        });
        Ok(vote.unwrap_or(VoteValue::Remove))
    }

    async fn apply_vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        requested: VoteValue,
        score_delta: i64,
    ) -> Result<(), LedgerError> {
        let mut guard = self.posts.get_mut(&post_id).ok_or_else(|| missing(post_id))?;
        let entry = &mut *guard;
        let Voters::Live(voters) = &mut entry.voters else {
            return Err(LedgerError::Unavailable(format!(
                "voter ledger of post {post_id} is archived"
            )));
        };

        let new_score = entry
            .score
            .checked_add(score_delta)
            .ok_or(LedgerError::ScoreOverflow(post_id))?;
        {
            let mut indexes = self.indexes.write();
            indexes.global.rescore(post_id, entry.score, new_score);
            if let Some(index) = indexes.communities.get_mut(&entry.community_id) {
                index.rescore(post_id, entry.score, new_score);
            }
        }
        entry.score = new_score;

        if requested.is_remove() {
            voters.remove(&user_id);
        } else {
            voters.insert(user_id, requested);
        }
        Ok(())
    }

    async fn score(&self, post_id: PostId) -> Result<Option<i64>, LedgerError> {
        Ok(self.posts.get(&post_id).map(|entry| entry.score))
    }

    async fn ranked_ids(
        &self,
        community: Option<CommunityId>,
        order: RankOrder,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<PostId>, LedgerError> {
        let indexes = self.indexes.read();
        let index = match community {
            None => &indexes.global,
            Some(community_id) => match indexes.communities.get(&community_id) {
                Some(index) => index,
                None => return Ok(Vec::new()),
            },
        };
        Ok(index.page(order, offset, limit))
    }

    async fn upvote_counts(&self, post_ids: &[PostId]) -> Result<Vec<i64>, LedgerError> {
        let counts = post_ids
            .iter()
            .map(|post_id| match self.posts.get(post_id) {
                Some(entry) => match &entry.voters {
                    Voters::Live(voters) => {
                        voters.values().filter(|vote| **vote == VoteValue::Up).count() as i64
                    }
                    Voters::Archived(totals) => totals.upvotes,
                },
                None => 0,
            })
            .collect();
        Ok(counts)
    }

    async fn vote_totals(&self, post_id: PostId) -> Result<Option<VotesCount>, LedgerError> {
        Ok(self.posts.get(&post_id).map(|entry| match &entry.voters {
            Voters::Live(voters) => count_votes(post_id, voters),
            Voters::Archived(totals) => *totals,
        }))
    }

    async fn expired_items(&self, cutoff: i64) -> Result<Vec<PostId>, LedgerError> {
        let mut expired: Vec<PostId> = self
            .posts
            .iter()
            .filter(|entry| entry.created_at < cutoff && matches!(entry.voters, Voters::Live(_)))
            .map(|entry| *entry.key())
            .collect();
        expired.sort_unstable();
        Ok(expired)
    }

    async fn drop_voters(&self, post_id: PostId) -> Result<bool, LedgerError> {
        let mut guard = self.posts.get_mut(&post_id).ok_or_else(|| missing(post_id))?;
        let totals = match &guard.voters {
            Voters::Live(voters) => count_votes(post_id, voters),
            Voters::Archived(_) => return Ok(false),
        };
        guard.voters = Voters::Archived(totals);
        Ok(true)
    }
}
