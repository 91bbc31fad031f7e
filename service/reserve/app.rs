use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use common::signal::{init_signals, wait_for_signals, CANCELLATION_TOKEN};
use common::{load_env_recursively, setup_logs};
use eyre::{Context, Result};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use trading_exchange::error::BootstrapError;
use trading_exchange::exchange::get_exchange_builder_manager;
use trading_exchange::pool::{Collaborators, ExchangePool};
use trading_model::model::TimeStampMs;

use crate::config::Config;
use crate::fetcher::{run_on_ticks, IntermediarySettler, TickHandler, TradeHistoryFetcher};
use crate::http_runner::{HttpRunner, TickReceivers};

/// Process exit code for a fatal bootstrap error.
pub const FATAL_EXIT_CODE: i32 = 10;
const TICK_CHANNEL_CAPACITY: usize = 16;

/// Terminate the process when `err` is fatal. Recoverable errors return so
/// the caller can decide.
pub fn exit_on_fatal(err: &BootstrapError) {
    if err.is_fatal() {
        error!(exchange = %err.exchange(), "fatal bootstrap error: {err}");
        std::process::exit(FATAL_EXIT_CODE);
    }
    warn!(exchange = %err.exchange(), "bootstrap error: {err}");
}

/// Ticks nobody in this service consumes yet.
struct IgnoredTick(&'static str);

#[async_trait]
impl TickHandler for IgnoredTick {
    fn name(&self) -> &'static str {
        self.0
    }
    async fn on_tick(&self, timepoint: TimeStampMs) -> usize {
        debug!(tick = self.0, timepoint, "tick has no consumer");
        0
    }
}

pub struct ReserveApp {
    pool: Arc<ExchangePool>,
    runner: HttpRunner,
    receivers: TickReceivers,
}

impl ReserveApp {
    pub async fn bootstrap(config: &Config, collaborators: &Collaborators) -> Result<Self, BootstrapError> {
        let manager = get_exchange_builder_manager();
        let pool = ExchangePool::bootstrap(
            &manager,
            &config.pool_settings(),
            &config.exchanges,
            &config.addresses,
            &config.min_deposit,
            collaborators,
        )
        .await?;
        let (runner, receivers) = HttpRunner::new(config.http_runner.addr, TICK_CHANNEL_CAPACITY);
        Ok(Self {
            pool: Arc::new(pool),
            runner,
            receivers,
        })
    }

    pub fn pool(&self) -> &Arc<ExchangePool> {
        &self.pool
    }

    /// Serve ticks until the process-wide cancellation token fires.
    pub async fn serve(self) -> Result<()> {
        let Self {
            pool,
            runner,
            receivers,
        } = self;
        runner.start().await?;

        let mut tasks = JoinSet::new();
        let fetcher = TradeHistoryFetcher::new(pool.fetcher_exchanges());
        let settler = IntermediarySettler::new(pool.intermediary_exchanges());
        let token = CANCELLATION_TOKEN.child_token();
        let TickReceivers {
            otick,
            atick,
            rtick,
            btick,
            ttick,
            gtick,
        } = receivers;
        {
            let token = token.clone();
            tasks.spawn(async move { run_on_ticks(&fetcher, ttick, token).await });
        }
        {
            let token = token.clone();
            tasks.spawn(async move { run_on_ticks(&settler, btick, token).await });
        }
        for (name, ticks) in [("otick", otick), ("atick", atick), ("rtick", rtick), ("gtick", gtick)] {
            let token = token.clone();
            tasks.spawn(async move { run_on_ticks(&IgnoredTick(name), ticks, token).await });
        }

        token.cancelled().await;
        runner.stop().await?;
        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                error!("tick task failed: {err}");
            }
        }
        Ok(())
    }
}

/// Load `.env`, read the config at `config_path`, bootstrap the exchanges and
/// serve ticks until SIGTERM or SIGINT.
pub async fn run(config_path: PathBuf, collaborators: Collaborators) -> Result<()> {
    load_env_recursively()?;
    let config = Config::try_from(config_path)
        .context("failed parsing config")?
        .with_env_overrides();
    let _guard = setup_logs(config.log.level, config.log.file.clone())?;
    let (mut sigterm, mut sigint) = init_signals()?;
    info!(exchanges = %config.exchanges, env = %config.env, "starting reserve");

    let app = match ReserveApp::bootstrap(&config, &collaborators).await {
        Ok(app) => app,
        Err(err) => {
            exit_on_fatal(&err);
            return Err(err.into());
        }
    };
    info!(exchanges = ?app.pool().ids(), "reserve bootstrapped");

    tokio::spawn(async move { wait_for_signals(&mut sigterm, &mut sigint).await });
    app.serve().await
}
