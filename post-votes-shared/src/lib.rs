//! # Post Votes Shared
//! This crate defines shared data structures and types used across the post votes crates.
//! It includes common definitions for vote values, vote events, stored votes, vote counts
//! and post metadata.
pub mod types;
