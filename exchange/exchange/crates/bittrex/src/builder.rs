use std::sync::Arc;

use async_trait::async_trait;
use trading_exchange_core::exchange::CentralizedExchange;
use trading_exchange_core::model::{
    BuildContext, BuildError, EnvironmentInterfaces, ExchangeAdapter, ExchangeBuilder, ExchangeInterface,
};
use trading_model::model::ExchangeId;

use crate::urls::bittrex_interfaces;

#[derive(Debug, Clone)]
pub struct BittrexExchangeBuilder {
    interfaces: EnvironmentInterfaces<ExchangeInterface>,
}

impl BittrexExchangeBuilder {
    pub fn new() -> Self {
        Self::with_interfaces(bittrex_interfaces())
    }
    pub fn with_interfaces(interfaces: EnvironmentInterfaces<ExchangeInterface>) -> Self {
        Self { interfaces }
    }
}

impl Default for BittrexExchangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeBuilder for BittrexExchangeBuilder {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Bittrex
    }
    fn interfaces(&self) -> Option<&EnvironmentInterfaces<ExchangeInterface>> {
        Some(&self.interfaces)
    }
    async fn build(&self, ctx: BuildContext<'_>) -> Result<Arc<dyn ExchangeAdapter>, BuildError> {
        let exchange = CentralizedExchange::from_context(ExchangeId::Bittrex, ctx)?;
        Ok(Arc::new(exchange))
    }
}
