use std::sync::Arc;

use async_trait::async_trait;
use trading_exchange_core::model::{
    BuildContext, BuildError, EnvironmentInterfaces, ExchangeAdapter, ExchangeBuilder, ExchangeInterface,
};
use trading_model::model::ExchangeId;

use crate::StableExchange;

#[derive(Debug, Clone, Default)]
pub struct StableExchangeBuilder;

impl StableExchangeBuilder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExchangeBuilder for StableExchangeBuilder {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::StableExchange
    }
    fn interfaces(&self) -> Option<&EnvironmentInterfaces<ExchangeInterface>> {
        None
    }
    fn requires_account(&self) -> bool {
        false
    }
    async fn build(&self, ctx: BuildContext<'_>) -> Result<Arc<dyn ExchangeAdapter>, BuildError> {
        let exchange = StableExchange::new(ctx.addresses, ctx.min_deposit)?;
        Ok(Arc::new(exchange))
    }
}
