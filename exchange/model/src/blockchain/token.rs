use std::fmt;

use serde::{Deserialize, Serialize};

/// An internal token known to the reserve, e.g. `ETH` or `KNC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub internal: bool,
}

impl Token {
    pub fn new(id: impl Into<String>, address: impl Into<String>, decimals: u32) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            decimals,
            internal: true,
        }
    }
}

/// Identifier of a trading pair, rendered as `BASE-QUOTE`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenPairId(String);

impl TokenPairId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenPairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenPairId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    pub base: String,
    pub quote: String,
}

impl TokenPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
    pub fn id(&self) -> TokenPairId {
        TokenPairId(format!("{}-{}", self.base, self.quote))
    }
}

/// Trading rules an exchange publishes for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPrecision {
    pub pair: TokenPair,
    pub price_precision: u32,
    pub amount_precision: u32,
    #[serde(default)]
    pub min_notional: f64,
}
