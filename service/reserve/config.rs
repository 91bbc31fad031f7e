use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use common::{env_var, LogLevel};
use serde::Deserialize;
use trading_exchange::model::{AddressConfig, MinDepositConfig};
use trading_exchange::pool::PoolSettings;

/// overrides the comma separated exchange list
pub const ENV_EXCHANGES: &str = "RESERVE_EXCHANGES";
/// overrides the deployment env tag
pub const ENV_RESERVE_ENV: &str = "RESERVE_ENV";

fn default_env() -> String {
    "dev".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub secret_file: PathBuf,
    pub ledger_dir: PathBuf,
}
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}
#[derive(Debug, Clone, Deserialize)]
pub struct HttpRunnerConfig {
    pub addr: SocketAddr,
}
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// comma separated exchange tickers, bootstrapped in order
    #[serde(default)]
    pub exchanges: String,
    #[serde(default = "default_env")]
    pub env: String,
    pub paths: PathsConfig,
    pub log: LogConfig,
    pub http_runner: HttpRunnerConfig,
    #[serde(default)]
    pub addresses: AddressConfig,
    #[serde(default)]
    pub min_deposit: MinDepositConfig,
}

impl Config {
    /// Apply `RESERVE_EXCHANGES` and `RESERVE_ENV` when they are set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(exchanges) = env_var(ENV_EXCHANGES) {
            self.exchanges = exchanges;
        }
        if let Some(env) = env_var(ENV_RESERVE_ENV) {
            self.env = env;
        }
        self
    }
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            secret_path: self.paths.secret_file.clone(),
            ledger_dir: self.paths.ledger_dir.clone(),
            env: self.env.clone(),
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl TryFrom<PathBuf> for Config {
    type Error = eyre::Error;

    fn try_from(path: PathBuf) -> Result<Self, Self::Error> {
        let toml_str = std::fs::read_to_string(&path).map_err(|e| eyre::eyre!("{}: {e}", path.display()))?;
        Config::from_str(&toml_str).map_err(|e| eyre::eyre!("{e}"))
    }
}
