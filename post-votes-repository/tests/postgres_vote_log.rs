//! Integration tests for the PostgreSQL vote log repository.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `cargo test --test postgres_vote_log`

use post_votes_repository::{
    PostCatalog, PostgresPostCatalog, PostgresVoteLogRepository, VoteLogRepository,
};
use post_votes_shared::types::{VoteEvent, VoteValue, VotesCount};
use sqlx::Row;

/// Creates a test vote event with default values.
fn make_vote_event() -> VoteEvent {
    VoteEvent {
        post_id: 1001,
        user_id: 42,
        vote: VoteValue::Up,
        voted_at: 1755182913,
    }
}

async fn stored_value(pool: &sqlx::PgPool, post_id: i64, user_id: i64) -> Option<i16> {
    sqlx::query("SELECT vote_value FROM post_vote WHERE post_id = $1 AND user_id = $2")
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .unwrap()
        .map(|row| row.get::<i16, _>("vote_value"))
}

// ============================================================================
// Vote Log Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_upsert_vote(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    let event = make_vote_event();

    repository.upsert_vote(&event).await.unwrap();
    assert_eq!(stored_value(&pool, event.post_id, event.user_id).await, Some(1));

    // Test update
    let flipped = VoteEvent {
        vote: VoteValue::Down,
        voted_at: event.voted_at + 10,
        ..event
    };
    repository.upsert_vote(&flipped).await.unwrap();

    let row = sqlx::query("SELECT vote_value, updated_at FROM post_vote WHERE post_id = $1 AND user_id = $2")
        .bind(event.post_id)
        .bind(event.user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i16, _>("vote_value"), -1);
    assert_eq!(
        row.get::<time::OffsetDateTime, _>("updated_at").unix_timestamp(),
        flipped.voted_at
    );
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_delete_vote(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    let event = make_vote_event();

    repository.upsert_vote(&event).await.unwrap();
    repository.delete_vote(event.post_id, event.user_id).await.unwrap();

    assert_eq!(stored_value(&pool, event.post_id, event.user_id).await, None);

    // Deleting a missing row is not an error
    repository.delete_vote(event.post_id, event.user_id).await.unwrap();
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_persist_votes_applies_removals(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    let events = vec![
        make_vote_event(),
        VoteEvent { user_id: 43, ..make_vote_event() },
        VoteEvent { user_id: 42, vote: VoteValue::Remove, ..make_vote_event() },
    ];

    let summary = repository.persist_votes(&events).await.unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(stored_value(&pool, 1001, 42).await, None);
    assert_eq!(stored_value(&pool, 1001, 43).await, Some(1));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_persist_votes_skips_failing_event(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    let events = vec![
        // Out of range for TIMESTAMPTZ, rejected before reaching the database
        VoteEvent { voted_at: i64::MAX, ..make_vote_event() },
        VoteEvent { user_id: 43, ..make_vote_event() },
    ];

    let summary = repository.persist_votes(&events).await.unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures().next().unwrap().user_id, 42);
    assert_eq!(stored_value(&pool, 1001, 43).await, Some(1));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_get_votes(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    repository.upsert_vote(&make_vote_event()).await.unwrap();
    repository
        .upsert_vote(&VoteEvent { post_id: 1002, vote: VoteValue::Down, ..make_vote_event() })
        .await
        .unwrap();

    let mut votes = repository.get_votes().await.unwrap();
    votes.sort_by_key(|v| v.post_id);

    assert_eq!(votes.len(), 2);
    assert_eq!(votes[0].post_id, 1001);
    assert_eq!(votes[0].vote, VoteValue::Up);
    assert_eq!(votes[0].updated_at, 1755182913);
    assert_eq!(votes[1].post_id, 1002);
    assert_eq!(votes[1].vote, VoteValue::Down);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_get_votes_empty(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    assert!(repository.get_votes().await.unwrap().is_empty());
}

// ============================================================================
// Vote Totals Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_save_vote_totals_upserts(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();

    repository
        .save_vote_totals(&[
            VotesCount { post_id: 1, upvotes: 3, downvotes: 1 },
            VotesCount { post_id: 2, upvotes: 0, downvotes: 2 },
        ])
        .await
        .unwrap();
    repository
        .save_vote_totals(&[VotesCount { post_id: 1, upvotes: 5, downvotes: 1 }])
        .await
        .unwrap();

    let rows = sqlx::query("SELECT post_id, upvotes, downvotes FROM post_vote_totals ORDER BY post_id")
        .fetch_all(&pool)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get::<i64, _>("upvotes"), 5);
    assert_eq!(rows[1].get::<i64, _>("downvotes"), 2);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_save_empty_vote_totals(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    repository.save_vote_totals(&[]).await.unwrap();

    let rows = sqlx::query("SELECT * FROM post_vote_totals").fetch_all(&pool).await.unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_check_tables_created(pool: sqlx::PgPool) {
    let repository = PostgresVoteLogRepository::new(pool.clone()).await.unwrap();
    assert!(repository.check_tables_created().await.unwrap());
}

// ============================================================================
// Post Catalog Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
async fn test_list_posts(pool: sqlx::PgPool) {
    sqlx::query(
        "CREATE TABLE post (post_id BIGINT PRIMARY KEY, community_id BIGINT NOT NULL, create_time TIMESTAMPTZ NOT NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO post (post_id, community_id, create_time) VALUES (7, 1, to_timestamp(1700000000)), (8, 2, to_timestamp(1700000100))",
    )
    .execute(&pool)
    .await
    .unwrap();

    let catalog = PostgresPostCatalog::new(pool.clone()).await.unwrap();
    let posts = catalog.list_posts().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].post_id, 7);
    assert_eq!(posts[0].community_id, 1);
    assert_eq!(posts[0].created_at, 1700000000);
    assert_eq!(posts[1].post_id, 8);
    assert_eq!(posts[1].created_at, 1700000100);
}
