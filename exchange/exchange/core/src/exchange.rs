//! State and behavior shared by the centralized exchange adapters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Context, ContextCompat, Result};
use parking_lot::RwLock;
use tracing::{debug, info, warn};
use trading_model::model::{now_ms, AllTradeHistory, ExchangeId, PairPrecision, TimeStampMs, Token};

use crate::model::{BuildContext, BuildError, CoreExchange, ExchangeAdapter, ExchangeEndpoint, FetcherExchange};
use crate::storage::{Ledger, LedgerError};

pub struct CentralizedExchange {
    id: ExchangeId,
    endpoint: Arc<dyn ExchangeEndpoint>,
    ledger: Arc<Ledger>,
    /// token id -> deposit address in use
    addresses: RwLock<BTreeMap<String, String>>,
    min_deposit: BTreeMap<String, f64>,
    pairs: RwLock<Vec<PairPrecision>>,
}

impl CentralizedExchange {
    pub fn new(
        id: ExchangeId,
        endpoint: Arc<dyn ExchangeEndpoint>,
        ledger: Arc<Ledger>,
        addresses: BTreeMap<String, String>,
        min_deposit: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            id,
            endpoint,
            ledger,
            addresses: RwLock::new(addresses),
            min_deposit,
            pairs: RwLock::new(vec![]),
        }
    }
    /// Connect the endpoint for the resolved interface and take over the
    /// ledger and configured addresses of `ctx`.
    pub fn from_context(id: ExchangeId, ctx: BuildContext<'_>) -> Result<Self, BuildError> {
        let interface = ctx
            .interface
            .with_context(|| format!("{id}: no interface resolved for env {:?}", ctx.env))?;
        let ledger = ctx.ledger.with_context(|| format!("{id}: ledger is not open"))?;
        let endpoint = ctx.endpoints.connect(id, interface, ctx.signing.as_ref())?;
        info!(exchange = %id, env = ctx.env, endpoint = %interface.public_endpoint, "connected exchange endpoint");
        Ok(Self::new(id, endpoint, ledger, ctx.addresses, ctx.min_deposit))
    }
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }
    pub fn endpoint(&self) -> &Arc<dyn ExchangeEndpoint> {
        &self.endpoint
    }
    fn configured_tokens(&self) -> BTreeSet<String> {
        self.addresses.read().keys().cloned().collect()
    }
}

#[async_trait]
impl CoreExchange for CentralizedExchange {
    fn id(&self) -> ExchangeId {
        self.id
    }

    /// Keep the address the exchange reports for `token`; fall back to
    /// `address` when it reports none or cannot be reached.
    async fn update_deposit_address(&self, token: &Token, address: &str) -> Result<()> {
        let live = match self.endpoint.get_deposit_address(token).await {
            Ok(live) => live.filter(|live| !live.is_empty()),
            Err(err) => {
                warn!(exchange = %self.id, token = %token.id, "cannot get deposit address: {err:#}");
                None
            }
        };
        let address = match live {
            Some(live) => {
                if live != address {
                    info!(exchange = %self.id, token = %token.id, configured = address, %live, "using live deposit address");
                }
                live
            }
            None => address.to_string(),
        };
        self.addresses.write().insert(token.id.clone(), address);
        Ok(())
    }

    async fn update_pairs_precision(&self) -> Result<()> {
        let info = self
            .endpoint
            .get_exchange_info()
            .await
            .with_context(|| format!("{}: get exchange info", self.id))?;
        let tokens = self.configured_tokens();
        let pairs: Vec<PairPrecision> = info
            .into_iter()
            .filter(|precision| tokens.contains(&precision.pair.base) && tokens.contains(&precision.pair.quote))
            .collect();
        debug!(exchange = %self.id, pairs = pairs.len(), "updated pairs precision");
        *self.pairs.write() = pairs;
        Ok(())
    }

    fn deposit_address(&self, token: &str) -> Option<String> {
        self.addresses.read().get(token).cloned()
    }

    fn min_deposit(&self, token: &str) -> Option<f64> {
        self.min_deposit.get(token).copied()
    }

    fn pairs(&self) -> Vec<PairPrecision> {
        self.pairs.read().clone()
    }
}

#[async_trait]
impl FetcherExchange for CentralizedExchange {
    async fn fetch_trade_history(&self) -> Result<()> {
        let mut history = AllTradeHistory::new(now_ms());
        for precision in self.pairs() {
            let pair_id = precision.pair.id();
            let last_id = self.ledger.get_last_id_trade_history(self.id, &pair_id)?;
            match self
                .endpoint
                .get_trade_history(&precision.pair, last_id.as_deref())
                .await
            {
                Ok(trades) if trades.is_empty() => {}
                Ok(mut trades) => {
                    trades.sort_by_key(|trade| trade.timestamp);
                    history.insert(self.id, pair_id, trades);
                }
                Err(err) => warn!(exchange = %self.id, pair = %pair_id, "cannot fetch trade history: {err:#}"),
            }
        }
        if history.record_count() > 0 {
            self.ledger.store_trade_history(&history)?;
        }
        Ok(())
    }

    fn get_trade_history(&self, from: TimeStampMs, to: TimeStampMs) -> Result<AllTradeHistory, LedgerError> {
        self.ledger.get_trade_history(from, to)
    }
}

impl ExchangeAdapter for CentralizedExchange {
    fn into_core(self: Arc<Self>) -> Arc<dyn CoreExchange> {
        self
    }
    fn into_fetcher(self: Arc<Self>) -> Option<Arc<dyn FetcherExchange>> {
        Some(self)
    }
}
