//! This module defines and re-exports the interfaces for the repository.
//! It serves as a central point for accessing traits related to data interaction.
mod post_catalog;
mod vote_log;

pub use post_catalog::PostCatalog;
pub use vote_log::VoteLogRepository;
