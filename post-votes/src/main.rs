//! Post Votes Main Entry Point
//!
//! Boots the voting subsystem: rebuilds the live ledger from PostgreSQL,
//! then runs the durability worker and the archive sweeper until a shutdown
//! signal arrives, draining pending votes before exiting.

use dotenv::dotenv;
use post_votes::{Dependencies, ServiceConfig, ServiceError, run_until};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("post_votes=info,post_votes_pipeline=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "post-votes",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

/// Waits for Ctrl+C, or SIGTERM on Unix.
async fn wait_for_shutdown() -> Result<(), ServiceError> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting post votes service");

    let config = ServiceConfig::from_env()?;

    let deps = match Dependencies::new(&config).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };
    deps.reconciler.rebuild(deps.catalog.as_ref()).await?;

    let stats = run_until(deps, config.archive_interval, wait_for_shutdown()).await?;
    info!(
        events_flushed = stats.events_flushed,
        events_failed = stats.events_failed,
        events_dropped = stats.events_dropped,
        "Post votes service stopped"
    );
    Ok(())
}
