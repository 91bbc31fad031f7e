use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use tracing::{debug, info, warn};
use trading_exchange_core::exchange::CentralizedExchange;
use trading_exchange_core::model::{
    BlockchainContext, CoreExchange, ExchangeAdapter, FetcherExchange, IntermediaryExchange, NonceSource,
    SettleSummary, TxSigner,
};
use trading_exchange_core::storage::LedgerError;
use trading_model::model::{ActivityId, AllTradeHistory, ExchangeId, MiningStatus, PairPrecision, TimeStampMs, Token, TxEntry};

/// nonce window of the intermediary wallet
pub const INTERMEDIATOR_NONCE_WINDOW_MS: TimeStampMs = 10_000;

/// Huobi adapter. Deposits reach huobi through an intermediary wallet, so
/// on top of the shared exchange state it tracks the second hop of every
/// deposit in the ledger.
pub struct HuobiExchange {
    inner: CentralizedExchange,
    blockchain: Arc<dyn BlockchainContext>,
    intermediator: Arc<dyn TxSigner>,
    nonce: Arc<dyn NonceSource>,
}

impl HuobiExchange {
    pub fn new(
        inner: CentralizedExchange,
        blockchain: Arc<dyn BlockchainContext>,
        intermediator: Arc<dyn TxSigner>,
        nonce: Arc<dyn NonceSource>,
    ) -> Self {
        Self {
            inner,
            blockchain,
            intermediator,
            nonce,
        }
    }
    pub fn intermediator_address(&self) -> &str {
        self.intermediator.address()
    }
    pub fn nonce(&self) -> &Arc<dyn NonceSource> {
        &self.nonce
    }
}

#[async_trait]
impl CoreExchange for HuobiExchange {
    fn id(&self) -> ExchangeId {
        ExchangeId::Huobi
    }
    async fn update_deposit_address(&self, token: &Token, address: &str) -> Result<()> {
        self.inner.update_deposit_address(token, address).await
    }
    async fn update_pairs_precision(&self) -> Result<()> {
        self.inner.update_pairs_precision().await
    }
    fn deposit_address(&self, token: &str) -> Option<String> {
        self.inner.deposit_address(token)
    }
    fn min_deposit(&self, token: &str) -> Option<f64> {
        self.inner.min_deposit(token)
    }
    fn pairs(&self) -> Vec<PairPrecision> {
        self.inner.pairs()
    }
}

#[async_trait]
impl FetcherExchange for HuobiExchange {
    async fn fetch_trade_history(&self) -> Result<()> {
        self.inner.fetch_trade_history().await
    }
    fn get_trade_history(&self, from: TimeStampMs, to: TimeStampMs) -> Result<AllTradeHistory, LedgerError> {
        self.inner.get_trade_history(from, to)
    }
}

#[async_trait]
impl IntermediaryExchange for HuobiExchange {
    fn record_intermediate_deposit(&self, id: &ActivityId, tx: &TxEntry) -> Result<(), LedgerError> {
        self.inner.ledger().store_pending_intermediate_tx(id, tx)
    }

    /// Mined hops move to the confirmed partition, failed or lost ones are
    /// dropped, everything else stays pending for the next pass.
    async fn settle_pending_intermediate_txs(&self) -> Result<SettleSummary> {
        let ledger = self.inner.ledger();
        let mut summary = SettleSummary::default();
        let pending: BTreeMap<ActivityId, TxEntry> = ledger.get_pending_intermediate_txs()?.into_iter().collect();
        for (id, tx) in pending {
            let status = match self.blockchain.tx_status(&tx.hash).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(%id, hash = %tx.hash, "cannot get intermediate tx status: {err:#}");
                    summary.pending += 1;
                    continue;
                }
            };
            match status {
                MiningStatus::Mined => {
                    ledger.confirm_intermediate_tx(&id, &tx.with_mining_status(status))?;
                    summary.confirmed += 1;
                }
                MiningStatus::Failed | MiningStatus::Lost => {
                    warn!(%id, hash = %tx.hash, %status, "dropping intermediate tx");
                    ledger.remove_pending_intermediate_tx(&id)?;
                    summary.dropped += 1;
                }
                MiningStatus::Submitted | MiningStatus::Unknown => {
                    debug!(%id, hash = %tx.hash, %status, "intermediate tx still pending");
                    summary.pending += 1;
                }
            }
        }
        if summary.confirmed + summary.dropped > 0 {
            info!(?summary, "settled intermediate txs");
        }
        Ok(summary)
    }

    fn intermediate_tx(&self, id: &ActivityId) -> Result<TxEntry, LedgerError> {
        self.inner.ledger().get_intermediate_tx(id)
    }
}

impl ExchangeAdapter for HuobiExchange {
    fn into_core(self: Arc<Self>) -> Arc<dyn CoreExchange> {
        self
    }
    fn into_fetcher(self: Arc<Self>) -> Option<Arc<dyn FetcherExchange>> {
        Some(self)
    }
    fn into_intermediary(self: Arc<Self>) -> Option<Arc<dyn IntermediaryExchange>> {
        Some(self)
    }
}
