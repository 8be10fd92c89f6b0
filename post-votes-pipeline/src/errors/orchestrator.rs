//! Error types for the durability worker.
use thiserror::Error;
use crate::errors::LoaderError;

/// Represents errors that stop the durability worker from starting.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),
    #[error("Vote log tables are missing")]
    TablesMissing,
}
