use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use trading_model::model::{MiningStatus, TimeStampMs, Token};

use crate::model::SecretFile;

pub trait TokenResolver: Send + Sync {
    fn get_internal_token_by_id(&self, id: &str) -> Result<Token>;
}

pub trait TxSigner: Send + Sync {
    fn address(&self) -> &str;
}

#[async_trait]
pub trait NonceSource: Send + Sync {
    fn address(&self) -> &str;
    async fn next_nonce(&self) -> Result<u64>;
}

#[async_trait]
pub trait BlockchainContext: Send + Sync {
    /// Signer of the intermediary wallet, loaded from the secret file.
    fn intermediator_signer(&self, secrets: &SecretFile) -> Result<Arc<dyn TxSigner>>;
    /// Nonce source for `signer` that reuses a nonce within `window_ms`.
    fn time_window_nonce(&self, signer: Arc<dyn TxSigner>, window_ms: TimeStampMs) -> Arc<dyn NonceSource>;
    async fn tx_status(&self, hash: &str) -> Result<MiningStatus>;
}
