//! Dependency initialization and wiring for the post votes service.

use std::sync::Arc;
use std::time::Duration;

use post_votes_pipeline::ingress::VoteIngress;
use post_votes_pipeline::ledger::{ItemLocks, LedgerStore, MemoryLedgerStore};
use post_votes_pipeline::loader::VoteLoader;
use post_votes_pipeline::orchestrator::{DurabilityWorker, PipelineStats};
use post_votes_pipeline::ranking::RankingQuery;
use post_votes_pipeline::reconcile::Reconciler;
use post_votes_repository::{
    PostCatalog, PostgresPostCatalog, PostgresVoteLogRepository, VoteLogRepository, run_migrations,
};
use sqlx::PgPool;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{ConnectionMode, ServiceConfig};
use crate::{ServiceError, VotingService};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Facade handed to the request layer.
    pub service: VotingService,
    /// Durability worker, ready to be spawned.
    pub worker: DurabilityWorker,
    /// Rebuilds the ledger at boot and archives expired posts.
    pub reconciler: Arc<Reconciler>,
    pub catalog: Arc<dyn PostCatalog>,
    pub stats: Arc<PipelineStats>,
    /// Signals the worker and the archive sweeper to stop.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl Dependencies {
    /// Connects to PostgreSQL, applies migrations and wires every component.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ServiceError)` - If initialization fails (connection failures only in fail-fast mode)
    pub async fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        info!(
            connection_mode = ?config.connection_mode,
            retry_interval_secs = config.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let pool = Self::connect_to_database(
            &config.database_url,
            config.connection_mode,
            config.retry_interval,
        )
        .await?;
        info!("Database connection established");

        run_migrations(&pool).await?;
        info!("Vote log migrations applied");

        let vote_log = Arc::new(PostgresVoteLogRepository::new(pool.clone()).await?);
        let catalog = Arc::new(PostgresPostCatalog::new(pool).await?);

        Ok(Self::wire(config, vote_log, catalog))
    }

    /// Wires the in-memory core on top of the given repositories.
    pub fn wire(
        config: &ServiceConfig,
        vote_log: Arc<dyn VoteLogRepository>,
        catalog: Arc<dyn PostCatalog>,
    ) -> Self {
        let ledger: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
        let locks = Arc::new(ItemLocks::default());
        let stats = Arc::new(PipelineStats::default());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (sender, receiver) = config.pipeline.channel();

        let mut ingress = VoteIngress::new(
            ledger.clone(),
            locks.clone(),
            config.rules,
            sender,
            stats.clone(),
        );
        if config.feedback_tally {
            ingress = ingress.with_feedback_tally();
        }

        let worker = DurabilityWorker::new(
            VoteLoader::new(vote_log.clone()),
            config.pipeline.clone(),
            receiver,
            shutdown_rx,
            stats.clone(),
        );
        let reconciler = Arc::new(Reconciler::new(ledger.clone(), locks, vote_log, config.rules));
        let service = VotingService::new(Arc::new(ingress), RankingQuery::new(ledger.clone()), ledger);

        Self {
            service,
            worker,
            reconciler,
            catalog,
            stats,
            shutdown_tx,
        }
    }

    /// Connect to PostgreSQL with retry logic based on connection mode.
    async fn connect_to_database(
        url: &str,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<PgPool, ServiceError> {
        loop {
            match PgPool::connect(url).await {
                Ok(pool) => return Ok(pool),
                Err(e) => match mode {
                    ConnectionMode::FailFast => return Err(ServiceError::Database(e)),
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to database, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}
