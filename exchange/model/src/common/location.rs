use serde_with_macros::{DeserializeFromStr, SerializeDisplay};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Identity of one exchange adapter. The ticker is the name used in
/// configuration, ledger file names and trade-history keys.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ExchangeId {
    StableExchange,
    Bittrex,
    Binance,
    Huobi,
}

impl ExchangeId {
    pub fn ticker(&self) -> &'static str {
        self.into()
    }
    /// name of the ledger file backing this exchange
    pub fn ledger_file_name(&self) -> String {
        format!("{}.db", self.ticker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_exchange_ticker_round_trips_through_from_str() {
        for exchange in ExchangeId::iter() {
            assert_eq!(ExchangeId::from_str(exchange.ticker()).unwrap(), exchange);
        }
        assert_eq!(ExchangeId::StableExchange.ticker(), "stable_exchange");
        assert!(ExchangeId::from_str("unknown_exchange").is_err());
    }

    #[test]
    fn test_exchange_serializes_as_ticker() {
        let value = serde_json::to_string(&ExchangeId::Huobi).unwrap();
        assert_eq!(value, "\"huobi\"");
        let parsed: ExchangeId = serde_json::from_str("\"binance\"").unwrap();
        assert_eq!(parsed, ExchangeId::Binance);
    }
}
