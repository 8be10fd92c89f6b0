//! Service configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use post_votes_pipeline::orchestrator::PipelineConfig;
use post_votes_pipeline::rules::{MAX_SCORE_PER_VOTE, VotingRules};
use tracing::{info, warn};

use crate::ServiceError;

/// Default period of the expired-post archive sweep in seconds.
const DEFAULT_ARCHIVE_INTERVAL_SECS: u64 = 3600;

/// Default database connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for the database at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry the connection periodically until it succeeds.
    Retry,
}

impl ConnectionMode {
    /// Parse connection mode from `DATABASE_CONNECTION_MODE`.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn from_env() -> Self {
        match env::var("DATABASE_CONNECTION_MODE")
            .unwrap_or_else(|_| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid DATABASE_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// All settings of the post votes service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub rules: VotingRules,
    pub pipeline: PipelineConfig,
    /// Whether the ingress keeps a feedback tally.
    pub feedback_tally: bool,
    pub archive_interval: Duration,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl ServiceConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `VOTING_WINDOW_SECS`: Voting window (default: 604800)
    /// - `SCORE_PER_VOTE`: Score per vote unit, at most one year (default: 432)
    /// - `VOTE_QUEUE_CAPACITY`: Durability queue capacity (default: 10000)
    /// - `VOTE_BATCH_SIZE`: Flush threshold (default: 100)
    /// - `VOTE_FLUSH_INTERVAL_SECS`: Flush timer (default: 5)
    /// - `VOTE_FEEDBACK_TALLY`: Enable the feedback tally (default: true)
    /// - `ARCHIVE_INTERVAL_SECS`: Archive sweep period (default: 3600)
    /// - `DATABASE_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `DATABASE_RETRY_INTERVAL_SECS`: Retry interval (default: 15)
    ///
    /// Invalid values are logged and replaced by their default.
    ///
    /// # Returns
    ///
    /// * `Ok(ServiceConfig)` - Loaded configuration
    /// * `Err(ServiceError)` - If `DATABASE_URL` is missing
    pub fn from_env() -> Result<Self, ServiceError> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ServiceError::config("DATABASE_URL must be set"))?;

        let default_rules = VotingRules::default();
        let rules = VotingRules {
            voting_window_secs: positive_var("VOTING_WINDOW_SECS", default_rules.voting_window_secs),
            score_per_vote: bounded_var(
                "SCORE_PER_VOTE",
                default_rules.score_per_vote,
                MAX_SCORE_PER_VOTE,
            ),
        };

        let default_pipeline = PipelineConfig::default();
        let pipeline = PipelineConfig {
            queue_capacity: positive_var("VOTE_QUEUE_CAPACITY", default_pipeline.queue_capacity),
            batch_size: positive_var("VOTE_BATCH_SIZE", default_pipeline.batch_size),
            flush_interval: Duration::from_secs(positive_var(
                "VOTE_FLUSH_INTERVAL_SECS",
                default_pipeline.flush_interval.as_secs(),
            )),
        };

        let config = Self {
            database_url,
            rules,
            pipeline,
            feedback_tally: parsed_var("VOTE_FEEDBACK_TALLY", true),
            archive_interval: Duration::from_secs(positive_var(
                "ARCHIVE_INTERVAL_SECS",
                DEFAULT_ARCHIVE_INTERVAL_SECS,
            )),
            connection_mode: ConnectionMode::from_env(),
            retry_interval: Duration::from_secs(positive_var(
                "DATABASE_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL_SECS,
            )),
        };

        info!(
            voting_window_secs = config.rules.voting_window_secs,
            score_per_vote = config.rules.score_per_vote,
            queue_capacity = config.pipeline.queue_capacity,
            batch_size = config.pipeline.batch_size,
            flush_interval_secs = config.pipeline.flush_interval.as_secs(),
            feedback_tally = config.feedback_tally,
            connection_mode = ?config.connection_mode,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Reads and parses `name`, falling back to `default` when unset or unparsable.
fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Like `parsed_var`, but also rejects zero and negative values.
fn positive_var<T: FromStr + PartialOrd + Default + Copy>(name: &str, default: T) -> T {
    let value = parsed_var(name, default);
    if value > T::default() {
        value
    } else {
        warn!(variable = name, "Value must be positive, using default");
        default
    }
}

/// Like `positive_var`, but also rejects values above `max`.
fn bounded_var<T: FromStr + PartialOrd + Default + Copy>(name: &str, default: T, max: T) -> T {
    let value = positive_var(name, default);
    if value <= max {
        value
    } else {
        warn!(variable = name, "Value above maximum, using default");
        default
    }
}
