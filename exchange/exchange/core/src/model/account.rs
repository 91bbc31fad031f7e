use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eyre::{bail, Context, ContextCompat, Result};
use secrecy::{ExposeSecret, SecretString};
use trading_model::model::ExchangeId;

/// API key pair used to sign authenticated exchange requests.
#[derive(Debug, Clone)]
pub struct SigningApiKeySecret {
    pub api_key: SecretString,
    pub api_secret: SecretString,
}

impl SigningApiKeySecret {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_secret: SecretString::new(api_secret.into()),
        }
    }
    pub fn verify(&self, name: &str) -> Result<()> {
        if self.api_key.expose_secret().is_empty() {
            bail!("{}: api_key is empty", name);
        }
        if self.api_secret.expose_secret().is_empty() {
            bail!("{}: api_secret is empty", name);
        }
        Ok(())
    }
}

/// Flat JSON object of secrets, e.g. `{"binance_key": "...", "binance_secret": "..."}`.
pub struct SecretFile {
    path: PathBuf,
    values: HashMap<String, SecretString>,
}

impl SecretFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading secret file: {}", path.display()))?;
        Self::parse(path, &content)
    }
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let values: HashMap<String, SecretString> =
            serde_json::from_str(content).with_context(|| format!("parsing secret file: {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn get(&self, name: &str) -> Result<&SecretString> {
        self.values
            .get(name)
            .with_context(|| format!("{} is missing from secret file {}", name, self.path.display()))
    }
    /// `<ticker>_key` and `<ticker>_secret`, both non-empty
    pub fn signing(&self, exchange: ExchangeId) -> Result<SigningApiKeySecret> {
        let ticker = exchange.ticker();
        let signing = SigningApiKeySecret {
            api_key: self.get(&format!("{ticker}_key"))?.clone(),
            api_secret: self.get(&format!("{ticker}_secret"))?.clone(),
        };
        signing.verify(ticker)?;
        Ok(signing)
    }
}

impl std::fmt::Debug for SecretFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretFile")
            .field("path", &self.path)
            .field("keys", &self.values.len())
            .finish()
    }
}
