use std::sync::Arc;

use async_trait::async_trait;
use trading_exchange_core::exchange::CentralizedExchange;
use trading_exchange_core::model::{
    BuildContext, BuildError, EnvironmentInterfaces, ExchangeAdapter, ExchangeBuilder, ExchangeInterface,
};
use trading_model::model::ExchangeId;

use crate::urls::binance_interfaces;

#[derive(Debug, Clone)]
pub struct BinanceExchangeBuilder {
    interfaces: EnvironmentInterfaces<ExchangeInterface>,
}

impl BinanceExchangeBuilder {
    pub fn new() -> Self {
        Self::with_interfaces(binance_interfaces())
    }
    pub fn with_interfaces(interfaces: EnvironmentInterfaces<ExchangeInterface>) -> Self {
        Self { interfaces }
    }
}

impl Default for BinanceExchangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeBuilder for BinanceExchangeBuilder {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Binance
    }
    fn interfaces(&self) -> Option<&EnvironmentInterfaces<ExchangeInterface>> {
        Some(&self.interfaces)
    }
    async fn build(&self, ctx: BuildContext<'_>) -> Result<Arc<dyn ExchangeAdapter>, BuildError> {
        let exchange = CentralizedExchange::from_context(ExchangeId::Binance, ctx)?;
        Ok(Arc::new(exchange))
    }
}
