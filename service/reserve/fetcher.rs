//! Tick consumers: trade-history fetching and intermediary settlement.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use trading_exchange::model::{FetcherExchange, IntermediaryExchange};
use trading_model::model::TimeStampMs;

/// Work done once per received tick.
#[async_trait]
pub trait TickHandler: Send + Sync {
    fn name(&self) -> &'static str;
    /// Returns the number of exchanges that failed this round.
    async fn on_tick(&self, timepoint: TimeStampMs) -> usize;
}

/// Runs one cycle over every fetcher exchange per `ttick`.
pub struct TradeHistoryFetcher {
    exchanges: Vec<Arc<dyn FetcherExchange>>,
}

impl TradeHistoryFetcher {
    pub fn new(exchanges: Vec<Arc<dyn FetcherExchange>>) -> Self {
        Self { exchanges }
    }
}

#[async_trait]
impl TickHandler for TradeHistoryFetcher {
    fn name(&self) -> &'static str {
        "trade_history_fetcher"
    }
    async fn on_tick(&self, timepoint: TimeStampMs) -> usize {
        let mut failed = 0;
        for exchange in &self.exchanges {
            if let Err(err) = exchange.fetch_trade_history().await {
                error!(exchange = %exchange.id(), timepoint, "fetch trade history failed: {err:#}");
                failed += 1;
            }
        }
        failed
    }
}

/// Settles pending intermediate transactions per `btick`.
pub struct IntermediarySettler {
    exchanges: Vec<Arc<dyn IntermediaryExchange>>,
}

impl IntermediarySettler {
    pub fn new(exchanges: Vec<Arc<dyn IntermediaryExchange>>) -> Self {
        Self { exchanges }
    }
}

#[async_trait]
impl TickHandler for IntermediarySettler {
    fn name(&self) -> &'static str {
        "intermediary_settler"
    }
    async fn on_tick(&self, timepoint: TimeStampMs) -> usize {
        let mut failed = 0;
        for exchange in &self.exchanges {
            match exchange.settle_pending_intermediate_txs().await {
                Ok(summary) => debug!(exchange = %exchange.id(), timepoint, ?summary, "settled intermediate txs"),
                Err(err) => {
                    error!(exchange = %exchange.id(), timepoint, "settle intermediate txs failed: {err:#}");
                    failed += 1;
                }
            }
        }
        failed
    }
}

/// Drive `handler` with every tick until the channel closes or `token` is
/// cancelled.
pub async fn run_on_ticks<H: TickHandler + ?Sized>(
    handler: &H,
    mut ticks: mpsc::Receiver<TimeStampMs>,
    token: CancellationToken,
) {
    info!(task = handler.name(), "waiting for ticks");
    loop {
        let timepoint = tokio::select! {
            _ = token.cancelled() => break,
            tick = ticks.recv() => match tick {
                Some(timepoint) => timepoint,
                None => break,
            },
        };
        handler.on_tick(timepoint).await;
    }
    info!(task = handler.name(), "stopped");
}
