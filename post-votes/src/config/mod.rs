//! Configuration module for the post votes service.
//! Defines application-wide settings and the wiring of its dependencies.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{ConnectionMode, ServiceConfig};
