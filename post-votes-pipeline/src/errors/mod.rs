mod ledger;
mod loader;
mod orchestrator;
mod reconcile;
mod vote;

pub use ledger::LedgerError;
pub use loader::LoaderError;
pub use orchestrator::OrchestratorError;
pub use reconcile::ReconcileError;
pub use vote::{VoteError, VoteRejection};
