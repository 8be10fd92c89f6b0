use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur within the post catalog.
///
/// This enum consolidates various error conditions specific to database interactions,
/// such as SQLx errors during database operations.
pub enum PostCatalogError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}
