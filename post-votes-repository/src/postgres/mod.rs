//! PostgreSQL implementation of the post votes repository.
//!
//! Provides the PostgreSQL backend for the `VoteLogRepository` and `PostCatalog`
//! traits with connection pooling and upsert-based writes.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - Upsert support with `ON CONFLICT DO UPDATE`
//! - Bulk operations using `QueryBuilder::push_values`
//! - Embedded migrations via `sqlx::migrate!`
//!
//! ## Database Tables
//!
//! - `post_vote`: Current vote per (post, user) pair
//! - `post_vote_totals`: Vote tallies of posts whose voting window has closed
//! - `post`: Post metadata, owned by the post CRUD flow and only read here
mod post_catalog;
mod vote_log_repository;

pub use post_catalog::PostgresPostCatalog;
pub use vote_log_repository::PostgresVoteLogRepository;

use crate::errors::VoteLogError;

/// Applies the embedded migrations to the given pool.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), VoteLogError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await?;
    Ok(())
}
