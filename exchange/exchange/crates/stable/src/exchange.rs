use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::{bail, Result};
use parking_lot::RwLock;
use trading_exchange_core::model::{CoreExchange, ExchangeAdapter, FetcherExchange};
use trading_model::model::{ExchangeId, PairPrecision, Token};

pub struct StableExchange {
    addresses: RwLock<BTreeMap<String, String>>,
    min_deposit: BTreeMap<String, f64>,
}

impl StableExchange {
    pub fn new(addresses: BTreeMap<String, String>, min_deposit: BTreeMap<String, f64>) -> Result<Self> {
        for (token, amount) in &min_deposit {
            if !amount.is_finite() || *amount < 0.0 {
                bail!("stable_exchange: invalid min deposit {} for {}", amount, token);
            }
        }
        Ok(Self {
            addresses: RwLock::new(addresses),
            min_deposit,
        })
    }
}

#[async_trait]
impl CoreExchange for StableExchange {
    fn id(&self) -> ExchangeId {
        ExchangeId::StableExchange
    }
    async fn update_deposit_address(&self, token: &Token, address: &str) -> Result<()> {
        self.addresses.write().insert(token.id.clone(), address.to_string());
        Ok(())
    }
    async fn update_pairs_precision(&self) -> Result<()> {
        Ok(())
    }
    fn deposit_address(&self, token: &str) -> Option<String> {
        self.addresses.read().get(token).cloned()
    }
    fn min_deposit(&self, token: &str) -> Option<f64> {
        self.min_deposit.get(token).copied()
    }
    fn pairs(&self) -> Vec<PairPrecision> {
        vec![]
    }
}

impl ExchangeAdapter for StableExchange {
    fn into_core(self: Arc<Self>) -> Arc<dyn CoreExchange> {
        self
    }
    fn into_fetcher(self: Arc<Self>) -> Option<Arc<dyn FetcherExchange>> {
        None
    }
}
