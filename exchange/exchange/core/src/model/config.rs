use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use trading_model::model::ExchangeId;

/// One `(token id, address)` pair to push to an exchange at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DepositAddressAssignment {
    pub token: String,
    pub address: String,
}

impl DepositAddressAssignment {
    pub fn new(token: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            address: address.into(),
        }
    }
}

/// exchange -> token id -> deposit address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressConfig(pub HashMap<ExchangeId, BTreeMap<String, String>>);

impl AddressConfig {
    pub fn exchange(&self, exchange: ExchangeId) -> BTreeMap<String, String> {
        self.0.get(&exchange).cloned().unwrap_or_default()
    }
    pub fn assignments(&self, exchange: ExchangeId) -> Vec<DepositAddressAssignment> {
        self.0
            .get(&exchange)
            .into_iter()
            .flatten()
            .map(|(token, address)| DepositAddressAssignment::new(token.as_str(), address.as_str()))
            .collect()
    }
}

/// exchange -> token id -> minimum deposit amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinDepositConfig(pub HashMap<ExchangeId, BTreeMap<String, f64>>);

impl MinDepositConfig {
    pub fn exchange(&self, exchange: ExchangeId) -> BTreeMap<String, f64> {
        self.0.get(&exchange).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_config_parses_exchange_keys() {
        let config: AddressConfig =
            serde_json::from_str(r#"{"binance": {"ETH": "0x1", "KNC": "0x2"}, "huobi": {}}"#).unwrap();
        assert_eq!(
            config.assignments(ExchangeId::Binance),
            vec![DepositAddressAssignment::new("ETH", "0x1"), DepositAddressAssignment::new("KNC", "0x2")]
        );
        assert!(config.assignments(ExchangeId::Huobi).is_empty());
        assert!(config.assignments(ExchangeId::Bittrex).is_empty());
        assert!(serde_json::from_str::<AddressConfig>(r#"{"kraken": {}}"#).is_err());
    }
}
