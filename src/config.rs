use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use crate::core_types::CurrencyCode;
use crate::currency::{Currency, PublishedRate};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// PostgreSQL connection URL, overridden by `DATABASE_URL`
    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Upper bound on waiting for a row lock held by another transfer
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            postgres_url: None,
            max_connections: default_max_connections(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl StorageConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Currency reference data and published rates
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CurrencyConfig {
    /// Triangulation hub for pairs with no direct or inverse factor
    #[serde(default)]
    pub base_currency: Option<CurrencyCode>,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub rates: Vec<PublishedRate>,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.storage.postgres_url = Some(url);
        }
        Ok(config)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for rate in &self.currency.rates {
            if rate.rate <= rust_decimal::Decimal::ZERO {
                anyhow::bail!(
                    "Rate {} -> {} must be positive, got {}",
                    rate.from,
                    rate.to,
                    rate.rate
                );
            }
        }
        Ok(())
    }
}
