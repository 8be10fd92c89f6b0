//! Error types for the post votes repository.
//! Consolidates and re-exports error types related to repository operations.
mod post_catalog;
mod vote_log;

pub use post_catalog::PostCatalogError;
pub use vote_log::VoteLogError;
