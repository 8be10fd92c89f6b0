//! # Post Votes Pipeline
//! This crate holds the voting and ranking core: the rule engine deciding vote
//! transitions, the in-memory ledger that ranks posts, the ingress fast path,
//! and the durability pipeline that batches accepted votes into the vote log.
//! Start-up reconciliation and expiry archiving live in `reconcile`.
pub mod errors;
pub mod ingress;
pub mod ledger;
pub mod loader;
pub mod orchestrator;
pub mod ranking;
pub mod reconcile;
pub mod rules;
