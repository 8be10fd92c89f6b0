//! Error types for the post votes service.
//! Consolidates the errors of configuration, database bootstrapping,
//! reconciliation and the durability worker.
use post_votes_pipeline::errors::{OrchestratorError, ReconcileError};
use post_votes_repository::{PostCatalogError, VoteLogError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Vote log error: {0}")]
    VoteLog(#[from] VoteLogError),
    #[error("Post catalog error: {0}")]
    PostCatalog(#[from] PostCatalogError),
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),
    #[error("Orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Signal handler error: {0}")]
    Signal(#[from] std::io::Error),
}

impl ServiceError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
