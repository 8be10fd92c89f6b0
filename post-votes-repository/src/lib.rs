//! # Post Votes Repository
//! This crate provides traits and implementations for the durable side of the
//! voting subsystem: the vote log written by the durability pipeline, the archived
//! vote totals of expired posts, and read access to post metadata. It includes
//! definitions for errors, interfaces, and concrete implementations for PostgreSQL.
pub mod errors;
pub mod interfaces;
pub mod postgres;
pub mod types;

pub use errors::{PostCatalogError, VoteLogError};
pub use interfaces::{PostCatalog, VoteLogRepository};
pub use postgres::{PostgresPostCatalog, PostgresVoteLogRepository, run_migrations};
pub use types::{BatchOperationResult, BatchOperationSummary};
