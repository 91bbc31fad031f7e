use std::sync::Arc;

use async_trait::async_trait;
use eyre::ContextCompat;
use tracing::info;
use trading_exchange_core::exchange::CentralizedExchange;
use trading_exchange_core::model::{
    BuildContext, BuildError, EnvironmentInterfaces, ExchangeAdapter, ExchangeBuilder, ExchangeInterface,
};
use trading_model::model::ExchangeId;

use crate::exchange::{HuobiExchange, INTERMEDIATOR_NONCE_WINDOW_MS};
use crate::urls::huobi_interfaces;

#[derive(Debug, Clone)]
pub struct HuobiExchangeBuilder {
    interfaces: EnvironmentInterfaces<ExchangeInterface>,
}

impl HuobiExchangeBuilder {
    pub fn new() -> Self {
        Self::with_interfaces(huobi_interfaces())
    }
    pub fn with_interfaces(interfaces: EnvironmentInterfaces<ExchangeInterface>) -> Self {
        Self { interfaces }
    }
}

impl Default for HuobiExchangeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeBuilder for HuobiExchangeBuilder {
    fn exchange(&self) -> ExchangeId {
        ExchangeId::Huobi
    }
    fn interfaces(&self) -> Option<&EnvironmentInterfaces<ExchangeInterface>> {
        Some(&self.interfaces)
    }
    async fn build(&self, ctx: BuildContext<'_>) -> Result<Arc<dyn ExchangeAdapter>, BuildError> {
        let secrets = ctx
            .secrets
            .context("huobi: secret file is required for the intermediator signer")
            .map_err(BuildError::credentials)?;
        let signer = ctx
            .blockchain
            .intermediator_signer(secrets)
            .map_err(BuildError::credentials)?;
        let nonce = ctx
            .blockchain
            .time_window_nonce(signer.clone(), INTERMEDIATOR_NONCE_WINDOW_MS);
        info!(address = signer.address(), "loaded huobi intermediator signer");
        let blockchain = ctx.blockchain.clone();
        let inner = CentralizedExchange::from_context(ExchangeId::Huobi, ctx)?;
        Ok(Arc::new(HuobiExchange::new(inner, blockchain, signer, nonce)))
    }
}
