use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use eyre::{ContextCompat, Result};
use thiserror::Error;
use trading_model::model::ExchangeId;

use crate::model::{
    BlockchainContext, EndpointConnector, EnvironmentInterfaces, ExchangeAdapter, ExchangeInterface, SecretFile,
    SigningApiKeySecret, TokenResolver,
};
use crate::storage::Ledger;

/// Everything the bootstrap resolved for one exchange before construction.
pub struct BuildContext<'a> {
    pub env: &'a str,
    pub interface: Option<&'a ExchangeInterface>,
    pub secrets: Option<&'a SecretFile>,
    pub signing: Option<SigningApiKeySecret>,
    pub ledger: Option<Arc<Ledger>>,
    pub addresses: BTreeMap<String, String>,
    pub min_deposit: BTreeMap<String, f64>,
    pub blockchain: Arc<dyn BlockchainContext>,
    pub endpoints: Arc<dyn EndpointConnector>,
    pub tokens: Arc<dyn TokenResolver>,
}

#[derive(Debug, Error)]
pub enum BuildError {
    /// missing or unusable credentials; the exchange can never start
    #[error("credentials: {error:#}")]
    Credentials { error: eyre::Report },
    #[error("construction: {error:#}")]
    Construction { error: eyre::Report },
}

impl BuildError {
    pub fn credentials(error: impl Into<eyre::Report>) -> Self {
        Self::Credentials { error: error.into() }
    }
}

impl From<eyre::Report> for BuildError {
    fn from(error: eyre::Report) -> Self {
        Self::Construction { error }
    }
}

#[async_trait]
pub trait ExchangeBuilder: Send + Sync {
    fn exchange(&self) -> ExchangeId;
    fn accept(&self, name: &str) -> bool {
        name == self.exchange().ticker()
    }
    /// `None` for exchanges without a remote endpoint
    fn interfaces(&self) -> Option<&EnvironmentInterfaces<ExchangeInterface>>;
    fn requires_account(&self) -> bool {
        true
    }
    fn requires_ledger(&self) -> bool {
        self.requires_account()
    }
    async fn build(&self, ctx: BuildContext<'_>) -> Result<Arc<dyn ExchangeAdapter>, BuildError>;
}

#[derive(Default)]
pub struct ExchangeBuilderManager {
    builders: Vec<Box<dyn ExchangeBuilder>>,
}

impl ExchangeBuilderManager {
    pub fn new() -> Self {
        Self { builders: vec![] }
    }
    pub fn add(&mut self, builder: Box<dyn ExchangeBuilder>) {
        self.builders.push(builder);
    }
    pub fn find_builder(&self, name: &str) -> Option<&dyn ExchangeBuilder> {
        self.builders
            .iter()
            .find(|builder| builder.accept(name))
            .map(|builder| builder.as_ref())
    }
    pub fn find_builder_result(&self, name: &str) -> Result<&dyn ExchangeBuilder> {
        self.find_builder(name)
            .with_context(|| format!("No builder found for exchange: {:?}", name))
    }
    pub fn exchanges(&self) -> Vec<ExchangeId> {
        self.builders.iter().map(|builder| builder.exchange()).collect()
    }
}
