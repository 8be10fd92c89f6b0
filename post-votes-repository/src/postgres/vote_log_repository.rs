use async_trait::async_trait;
use post_votes_shared::types::{PostId, StoredVote, UserId, VoteEvent, VoteValue, VotesCount};
use sqlx::Row;
use time::OffsetDateTime;
use tracing::debug;
use crate::{VoteLogError, VoteLogRepository};

/// PostgreSQL implementation of the durable vote log.
///
/// Each vote event is written as its own statement so a single bad row cannot
/// roll back the votes around it.
pub struct PostgresVoteLogRepository {
    pool: sqlx::PgPool,
}

impl PostgresVoteLogRepository {
    /// Creates a new PostgreSQL repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with required schema
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresVoteLogRepository)` - Ready-to-use repository instance
    /// * `Err(VoteLogError)` - Future validation errors (currently always succeeds)
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, VoteLogError> {
        Ok(Self { pool })
    }

    /// Upserts vote totals within an active transaction using a single bulk statement.
    async fn save_vote_totals_tx(
        &self,
        totals: &[VotesCount],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), VoteLogError> {
        if totals.is_empty() {
            return Ok(());
        }

        let mut query_builder = sqlx::QueryBuilder::new(
            "INSERT INTO post_vote_totals (post_id, upvotes, downvotes, archived_at)",
        );
        let archived_at = OffsetDateTime::now_utc();
        query_builder.push_values(totals, |mut b, count| {
            b.push_bind(count.post_id)
                .push_bind(count.upvotes)
                .push_bind(count.downvotes)
                .push_bind(archived_at);
        });
        query_builder.push(
            " ON CONFLICT (post_id) DO UPDATE SET \
              upvotes = EXCLUDED.upvotes, \
              downvotes = EXCLUDED.downvotes, \
              archived_at = EXCLUDED.archived_at",
        );

        query_builder.build().execute(&mut **tx).await?;
        Ok(())
    }
}

fn to_timestamp(unix: i64) -> Result<OffsetDateTime, VoteLogError> {
    OffsetDateTime::from_unix_timestamp(unix).map_err(|_| VoteLogError::InvalidTimestamp(unix))
}

#[async_trait]
impl VoteLogRepository for PostgresVoteLogRepository {
    async fn upsert_vote(&self, event: &VoteEvent) -> Result<(), VoteLogError> {
        sqlx::query(
            r#"
            INSERT INTO post_vote (post_id, user_id, vote_value, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (post_id, user_id)
            DO UPDATE SET
                vote_value = EXCLUDED.vote_value,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(event.post_id)
        .bind(event.user_id)
        .bind(i16::from(event.vote))
        .bind(to_timestamp(event.voted_at)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_vote(&self, post_id: PostId, user_id: UserId) -> Result<(), VoteLogError> {
        sqlx::query("DELETE FROM post_vote WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Retrieves every row of the vote log.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<StoredVote>)` - All stored votes (empty if none)
    /// * `Err(VoteLogError)` - Query failure or a row with an out-of-range vote value
    async fn get_votes(&self) -> Result<Vec<StoredVote>, VoteLogError> {
        let rows = sqlx::query("SELECT post_id, user_id, vote_value, updated_at FROM post_vote")
            .fetch_all(&self.pool)
            .await?;

        let mut votes = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_value: i16 = row.try_get("vote_value")?;
            let vote = VoteValue::try_from(raw_value as i64)
                .map_err(|_| VoteLogError::InvalidVoteValue(raw_value))?;
            let updated_at: OffsetDateTime = row.try_get("updated_at")?;
            votes.push(StoredVote {
                post_id: row.try_get("post_id")?,
                user_id: row.try_get("user_id")?,
                vote,
                updated_at: updated_at.unix_timestamp(),
            });
        }

        debug!(count = votes.len(), "Loaded stored votes");
        Ok(votes)
    }

    /// Atomically upserts the totals of every archived post in one transaction.
    async fn save_vote_totals(&self, totals: &[VotesCount]) -> Result<(), VoteLogError> {
        let mut tx = self.pool.begin().await?;
        self.save_vote_totals_tx(totals, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn check_tables_created(&self) -> Result<bool, VoteLogError> {
        for table in ["post_vote", "post_vote_totals"] {
            let table_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
