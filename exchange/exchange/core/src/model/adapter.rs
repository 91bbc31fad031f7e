use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use trading_model::model::{ActivityId, AllTradeHistory, ExchangeId, PairPrecision, TimeStampMs, Token, TxEntry};

use crate::storage::LedgerError;

#[async_trait]
pub trait CoreExchange: Send + Sync {
    fn id(&self) -> ExchangeId;
    async fn update_deposit_address(&self, token: &Token, address: &str) -> Result<()>;
    async fn update_pairs_precision(&self) -> Result<()>;
    fn deposit_address(&self, token: &str) -> Option<String>;
    fn min_deposit(&self, token: &str) -> Option<f64>;
    fn pairs(&self) -> Vec<PairPrecision>;
}

/// Exchanges whose account trades are pulled into the local ledger.
#[async_trait]
pub trait FetcherExchange: CoreExchange {
    /// Pull trades newer than the last stored one for every pair and store them.
    async fn fetch_trade_history(&self) -> Result<()>;
    fn get_trade_history(&self, from: TimeStampMs, to: TimeStampMs) -> Result<AllTradeHistory, LedgerError>;
}

/// Outcome of one pass over the pending intermediate transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleSummary {
    pub confirmed: usize,
    pub dropped: usize,
    pub pending: usize,
}

/// Exchanges funded through an intermediary wallet: every deposit is a
/// pending hop that becomes confirmed once the second transaction is mined.
#[async_trait]
pub trait IntermediaryExchange: CoreExchange {
    fn record_intermediate_deposit(&self, id: &ActivityId, tx: &TxEntry) -> Result<(), LedgerError>;
    async fn settle_pending_intermediate_txs(&self) -> Result<SettleSummary>;
    fn intermediate_tx(&self, id: &ActivityId) -> Result<TxEntry, LedgerError>;
}

pub trait ExchangeAdapter: CoreExchange {
    fn into_core(self: Arc<Self>) -> Arc<dyn CoreExchange>;
    fn into_fetcher(self: Arc<Self>) -> Option<Arc<dyn FetcherExchange>>;
    fn into_intermediary(self: Arc<Self>) -> Option<Arc<dyn IntermediaryExchange>> {
        None
    }
}
