//! Error types for ledger reconciliation and expiry archiving.
use thiserror::Error;
use post_votes_repository::{PostCatalogError, VoteLogError};
use crate::errors::LedgerError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Post catalog error: {0}")]
    PostCatalog(#[from] PostCatalogError),
    #[error("Vote log error: {0}")]
    VoteLog(#[from] VoteLogError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
