use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;
use trading_exchange_core::storage::LedgerError;
use trading_model::model::ExchangeId;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Can't get internal token {token}: {error:#}")]
    UnknownToken { token: String, error: eyre::Report },
    #[error("deposit address task failed: {error}")]
    Task { error: JoinError },
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{exchange}: {error:#}")]
    Configuration { exchange: ExchangeId, error: eyre::Report },
    #[error("{exchange}: cannot open ledger {path:?}: {error}")]
    StoreOpen {
        exchange: ExchangeId,
        path: PathBuf,
        error: LedgerError,
    },
    #[error("{exchange}: cannot construct adapter: {error:#}")]
    Construction { exchange: ExchangeId, error: eyre::Report },
    #[error("{exchange}: {error}")]
    Provision { exchange: ExchangeId, error: ProvisionError },
}

impl BootstrapError {
    /// Fatal errors mean the reserve cannot run with the current
    /// configuration; only construction failures are worth reporting and
    /// carrying on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Construction { .. })
    }
    pub fn exchange(&self) -> ExchangeId {
        match self {
            Self::Configuration { exchange, .. }
            | Self::StoreOpen { exchange, .. }
            | Self::Construction { exchange, .. }
            | Self::Provision { exchange, .. } => *exchange,
        }
    }
}
