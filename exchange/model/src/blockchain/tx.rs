use serde::{Deserialize, Serialize};

use crate::model::{ExchangeId, MiningStatus, TimeStampMs};

/// Observed state of one on-chain transaction tied to an activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxEntry {
    pub hash: String,
    pub exchange: ExchangeId,
    pub token: String,
    #[serde(default)]
    pub mining_status: MiningStatus,
    #[serde(default)]
    pub exchange_status: String,
    pub amount: f64,
    pub timestamp: TimeStampMs,
}

impl TxEntry {
    pub fn new(hash: impl Into<String>, exchange: ExchangeId, token: impl Into<String>, amount: f64, timestamp: TimeStampMs) -> Self {
        Self {
            hash: hash.into(),
            exchange,
            token: token.into(),
            mining_status: MiningStatus::Submitted,
            exchange_status: String::new(),
            amount,
            timestamp,
        }
    }
    pub fn with_mining_status(mut self, status: MiningStatus) -> Self {
        self.mining_status = status;
        self
    }
}
