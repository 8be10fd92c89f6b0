//! Background task supervision for the post votes service.

use std::future::Future;
use std::time::Duration;

use post_votes_pipeline::orchestrator::PipelineStatsSnapshot;
use tracing::{error, info, warn};

use crate::{Dependencies, ServiceError};

/// Spawns the durability worker and the archive sweeper, then runs until
/// `shutdown` resolves or the worker stops on its own.
///
/// Once the worker is gone every accepted vote would be dropped from the
/// queue, so an early worker exit ends the run with the worker's outcome.
///
/// # Arguments
///
/// * `deps` - Wired dependencies, ledger already rebuilt
/// * `archive_interval` - Period of the expiry archive sweep
/// * `shutdown` - Resolves when the service must drain and stop
///
/// # Returns
///
/// The final pipeline counters, or the error that stopped the worker.
pub async fn run_until<F>(
    deps: Dependencies,
    archive_interval: Duration,
    shutdown: F,
) -> Result<PipelineStatsSnapshot, ServiceError>
where
    F: Future<Output = Result<(), ServiceError>>,
{
    let Dependencies {
        service,
        worker,
        reconciler,
        catalog: _,
        stats,
        shutdown_tx,
    } = deps;

    let mut worker_handle = tokio::spawn(worker.run());
    let sweeper_handle = {
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move {
            reconciler.run_archive_sweeper(archive_interval, shutdown_rx).await
        })
    };

    info!("Post votes service running");
    let early_exit = tokio::select! {
        signal = shutdown => {
            match signal {
                Ok(()) => info!("Received shutdown signal"),
                Err(e) => error!(error = %e, "Shutdown signal handler failed, stopping"),
            }
            None
        }
        joined = &mut worker_handle => Some(joined),
    };

    let _ = shutdown_tx.send(());
    // Release the queue sender held by the ingress
    drop(service);
    sweeper_handle.await?;

    let stopped_early = early_exit.is_some();
    let outcome = match early_exit {
        Some(joined) => joined?,
        None => worker_handle.await?,
    };

    match outcome {
        Ok(snapshot) => {
            if stopped_early {
                warn!("Durability worker stopped before shutdown");
            }
            Ok(snapshot)
        }
        Err(e) => {
            let snapshot = stats.snapshot();
            error!(
                error = %e,
                events_received = snapshot.events_received,
                events_dropped = snapshot.events_dropped,
                "Durability worker failed"
            );
            Err(e.into())
        }
    }
}
