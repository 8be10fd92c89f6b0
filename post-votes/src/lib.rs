//! Post Votes Service Library
//!
//! This library wires the voting and ranking core into a runnable service:
//! configuration from the environment, dependency initialization, error
//! handling, and the `VotingService` facade embedded by the request layer.

pub mod config;
pub mod errors;
pub mod runner;
pub mod service;

pub use config::{Dependencies, ServiceConfig};
pub use errors::ServiceError;
pub use runner::run_until;
pub use service::VotingService;
