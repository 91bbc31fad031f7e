use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use trading_model::model::ExchangeId;

use crate::error::BootstrapError;
use crate::model::{
    AddressConfig, BlockchainContext, BuildContext, BuildError, CoreExchange, EndpointConnector, ExchangeAdapter,
    ExchangeBuilder, ExchangeBuilderManager, FetcherExchange, IntermediaryExchange, MinDepositConfig, SecretFile,
    TokenResolver,
};
use crate::provision::provision_deposit_addresses;
use crate::storage::Ledger;

#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub secret_path: PathBuf,
    /// directory holding one `<exchange>.db` ledger per exchange
    pub ledger_dir: PathBuf,
    pub env: String,
}

#[derive(Clone)]
pub struct Collaborators {
    pub blockchain: Arc<dyn BlockchainContext>,
    pub endpoints: Arc<dyn EndpointConnector>,
    pub tokens: Arc<dyn TokenResolver>,
}

/// The exchanges the reserve runs with, keyed by id.
pub struct ExchangePool {
    exchanges: BTreeMap<ExchangeId, Arc<dyn ExchangeAdapter>>,
}

impl ExchangePool {
    /// Bootstrap every exchange named in the comma separated `requested`
    /// list, in order.
    ///
    /// Blank names and names without a builder are skipped. The first error
    /// aborts the bootstrap; later exchanges are not touched.
    pub async fn bootstrap(
        manager: &ExchangeBuilderManager,
        settings: &PoolSettings,
        requested: &str,
        addresses: &AddressConfig,
        min_deposit: &MinDepositConfig,
        collaborators: &Collaborators,
    ) -> Result<Self, BootstrapError> {
        let mut exchanges: BTreeMap<ExchangeId, Arc<dyn ExchangeAdapter>> = BTreeMap::new();
        for name in requested.split(',').map(str::trim) {
            if name.is_empty() {
                continue;
            }
            let Some(builder) = manager.find_builder(name) else {
                debug!(name, "no builder registered for exchange, skipping");
                continue;
            };
            let exchange = builder.exchange();
            if exchanges.contains_key(&exchange) {
                warn!(%exchange, "exchange requested more than once, skipping");
                continue;
            }
            let adapter = bootstrap_exchange(builder, settings, addresses, min_deposit, collaborators).await?;
            exchanges.insert(exchange, adapter);
        }
        info!(exchanges = ?exchanges.keys().collect::<Vec<_>>(), "exchange pool ready");
        Ok(Self { exchanges })
    }

    pub fn fetcher_exchanges(&self) -> Vec<Arc<dyn FetcherExchange>> {
        self.exchanges
            .values()
            .filter_map(|adapter| adapter.clone().into_fetcher())
            .collect()
    }
    pub fn core_exchanges(&self) -> Vec<Arc<dyn CoreExchange>> {
        self.exchanges
            .values()
            .map(|adapter| adapter.clone().into_core())
            .collect()
    }
    pub fn intermediary_exchanges(&self) -> Vec<Arc<dyn IntermediaryExchange>> {
        self.exchanges
            .values()
            .filter_map(|adapter| adapter.clone().into_intermediary())
            .collect()
    }
    pub fn get(&self, exchange: ExchangeId) -> Option<Arc<dyn ExchangeAdapter>> {
        self.exchanges.get(&exchange).cloned()
    }
    pub fn ids(&self) -> Vec<ExchangeId> {
        self.exchanges.keys().copied().collect()
    }
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

async fn bootstrap_exchange(
    builder: &dyn ExchangeBuilder,
    settings: &PoolSettings,
    addresses: &AddressConfig,
    min_deposit: &MinDepositConfig,
    collaborators: &Collaborators,
) -> Result<Arc<dyn ExchangeAdapter>, BootstrapError> {
    let exchange = builder.exchange();
    let interface = builder
        .interfaces()
        .map(|interfaces| interfaces.resolve(&settings.env));

    let configuration = |error| BootstrapError::Configuration { exchange, error };
    let (secrets, signing) = if builder.requires_account() {
        let secrets = SecretFile::load(&settings.secret_path).map_err(configuration)?;
        let signing = secrets.signing(exchange).map_err(configuration)?;
        (Some(secrets), Some(signing))
    } else {
        (None, None)
    };

    let ledger = if builder.requires_ledger() {
        let path = settings.ledger_dir.join(exchange.ledger_file_name());
        let ledger = Ledger::open(&path).map_err(|error| BootstrapError::StoreOpen { exchange, path, error })?;
        Some(Arc::new(ledger))
    } else {
        None
    };

    let ctx = BuildContext {
        env: &settings.env,
        interface,
        secrets: secrets.as_ref(),
        signing,
        ledger,
        addresses: addresses.exchange(exchange),
        min_deposit: min_deposit.exchange(exchange),
        blockchain: collaborators.blockchain.clone(),
        endpoints: collaborators.endpoints.clone(),
        tokens: collaborators.tokens.clone(),
    };
    let adapter = builder.build(ctx).await.map_err(|err| match err {
        BuildError::Credentials { error } => BootstrapError::Configuration { exchange, error },
        BuildError::Construction { error } => BootstrapError::Construction { exchange, error },
    })?;

    // exchanges without an account keep their configured addresses as is
    if builder.requires_account() {
        provision_deposit_addresses(
            adapter.clone().into_core(),
            addresses.assignments(exchange),
            collaborators.tokens.clone(),
        )
        .await
        .map_err(|error| BootstrapError::Provision { exchange, error })?;

        if let Err(err) = adapter.update_pairs_precision().await {
            warn!(%exchange, "cannot update pairs precision: {err:#}");
        }
    } else {
        debug!(%exchange, "no account, skipping deposit address provisioning");
    }
    info!(%exchange, env = %settings.env, "exchange bootstrapped");
    Ok(adapter)
}
