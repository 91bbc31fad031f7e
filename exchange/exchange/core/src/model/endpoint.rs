use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use trading_model::model::{ExchangeId, PairPrecision, Token, TokenPair, TradeHistory};

use crate::model::{ExchangeInterface, SigningApiKeySecret};

/// Wire client of one exchange. Request signing, transport and rate limits
/// live behind this trait.
#[async_trait]
pub trait ExchangeEndpoint: Send + Sync {
    /// Deposit address the exchange currently reports for `token`, if any.
    async fn get_deposit_address(&self, token: &Token) -> Result<Option<String>>;
    async fn get_exchange_info(&self) -> Result<Vec<PairPrecision>>;
    /// Trades of `pair` newer than `from_id`, ascending by timestamp.
    async fn get_trade_history(&self, pair: &TokenPair, from_id: Option<&str>) -> Result<Vec<TradeHistory>>;
}

/// Creates endpoints for the interface resolved at bootstrap.
pub trait EndpointConnector: Send + Sync {
    fn connect(
        &self,
        exchange: ExchangeId,
        interface: &ExchangeInterface,
        signing: Option<&SigningApiKeySecret>,
    ) -> Result<Arc<dyn ExchangeEndpoint>>;
}
