/*
 * Configuration management for the quote service
 */

use crate::models::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub blockchain: BlockchainConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockchainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub connection_pool_size: usize,
    pub request_timeout_secs: u64,
}

impl BlockchainConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    /// Defaults, then the YAML file at `CONFIG_PATH` if present, then
    /// `V2QUOTE__SECTION__KEY` variables, then the well-known variables
    /// below. `ETHEREUM_RPC_URL` is required.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let path = env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(&path)
    }

    pub fn load(path: &str) -> Result<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("V2QUOTE")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("blockchain.rpc_url", env::var("ETHEREUM_RPC_URL").ok())?
            .set_override_option("server.host", env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", env::var("SERVER_PORT").ok())?
            .set_override_option("logging.level", env::var("LOG_LEVEL").ok())?
            .set_override_option("logging.format", env::var("LOG_FORMAT").ok())?;

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 1337)?
            .set_default("server.shutdown_timeout_secs", 30)?
            .set_default("blockchain.rpc_url", "")?
            .set_default("blockchain.chain_id", 1)?
            .set_default("blockchain.connection_pool_size", 5)?
            .set_default("blockchain.request_timeout_secs", 30)?
            .set_default("rate_limit.requests_per_minute", 600)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?)
    }

    fn validate(&self) -> Result<()> {
        if self.blockchain.rpc_url.is_empty() {
            return Err(QuoteError::Config("ETHEREUM_RPC_URL not set".to_string()));
        }
        if self.blockchain.connection_pool_size == 0 {
            return Err(QuoteError::Config(
                "blockchain.connection_pool_size must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.requests_per_minute == 0 {
            return Err(QuoteError::Config(
                "rate_limit.requests_per_minute must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
