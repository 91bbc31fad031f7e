use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ExchangeId, Side, TimeStampMs, TokenPairId};

/// One trade of the account on an exchange, as returned by its history API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeHistory {
    /// external trade id assigned by the exchange
    pub id: String,
    pub price: f64,
    pub qty: f64,
    pub side: Side,
    pub timestamp: TimeStampMs,
}

impl TradeHistory {
    pub fn new(id: impl Into<String>, price: f64, qty: f64, side: Side, timestamp: TimeStampMs) -> Self {
        Self {
            id: id.into(),
            price,
            qty,
            side,
            timestamp,
        }
    }
}

/// pair -> trades ordered by timestamp ascending
pub type ExchangeTradeHistory = BTreeMap<TokenPairId, Vec<TradeHistory>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllTradeHistory {
    /// capture time of the snapshot
    pub timestamp: TimeStampMs,
    pub data: BTreeMap<ExchangeId, ExchangeTradeHistory>,
}

impl AllTradeHistory {
    pub fn new(timestamp: TimeStampMs) -> Self {
        Self {
            timestamp,
            data: BTreeMap::new(),
        }
    }
    pub fn insert(&mut self, exchange: ExchangeId, pair: TokenPairId, history: Vec<TradeHistory>) {
        self.data.entry(exchange).or_default().insert(pair, history);
    }
    pub fn get(&self, exchange: ExchangeId, pair: &TokenPairId) -> Option<&Vec<TradeHistory>> {
        self.data.get(&exchange).and_then(|history| history.get(pair))
    }
    pub fn record_count(&self) -> usize {
        self.data
            .values()
            .flat_map(|history| history.values())
            .map(Vec::len)
            .sum()
    }
}
