//! PostgreSQL implementation of the post catalog.
//!
//! Reads post metadata from the `post` table maintained by the post CRUD flow.

use async_trait::async_trait;
use post_votes_shared::types::PostRecord;
use sqlx::Row;
use crate::PostCatalog;
use crate::errors::PostCatalogError;

/// PostgreSQL-backed post catalog.
pub struct PostgresPostCatalog {
    /// PostgreSQL connection pool
    pool: sqlx::PgPool,
}

impl PostgresPostCatalog {
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, PostCatalogError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl PostCatalog for PostgresPostCatalog {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, PostCatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT post_id, community_id, EXTRACT(EPOCH FROM create_time)::BIGINT AS created_at
            FROM post
            ORDER BY create_time
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(PostRecord {
                    post_id: row.try_get("post_id")?,
                    community_id: row.try_get("community_id")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
