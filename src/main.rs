//! Payment Ledger - HTTP service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐
//! │  Config  │───▶│ Storage  │───▶│  Ledger  │───▶│ Gateway  │
//! │  (YAML)  │    │(PG / mem)│    │ (Engine) │    │  (HTTP)  │
//! └──────────┘    └──────────┘    └──────────┘    └──────────┘
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};

use payment_ledger::config::{AppConfig, StorageBackend};
use payment_ledger::currency::{PgRateSource, StaticRateSource};
use payment_ledger::db::{Database, schema};
use payment_ledger::gateway;
use payment_ledger::logging::init_logging;
use payment_ledger::service::{Ledger, LedgerService};
use payment_ledger::store::{MemoryStorage, PgStorage};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

async fn build_ledger(config: &AppConfig) -> Result<Arc<dyn Ledger>> {
    let storage_cfg = &config.storage;
    let currency_cfg = &config.currency;

    match storage_cfg.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; balances are lost on exit");
            let storage = MemoryStorage::new(storage_cfg.lock_timeout());
            let rates = StaticRateSource::new(
                currency_cfg.currencies.clone(),
                currency_cfg.rates.clone(),
            );
            Ok(Arc::new(LedgerService::new(
                Arc::new(storage),
                Arc::new(rates),
                currency_cfg.base_currency,
            )))
        }
        StorageBackend::Postgres => {
            let url = storage_cfg
                .postgres_url
                .as_deref()
                .context("storage.postgres_url or DATABASE_URL is required for postgres backend")?;
            let db = Database::connect(url, storage_cfg.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;

            schema::init_schema(db.pool()).await?;
            schema::seed_reference_data(db.pool(), &currency_cfg.currencies, &currency_cfg.rates)
                .await?;

            let rates = PgRateSource::new(db.pool().clone());
            let storage = PgStorage::new(db, storage_cfg.lock_timeout());
            Ok(Arc::new(LedgerService::new(
                Arc::new(storage),
                Arc::new(rates),
                currency_cfg.base_currency,
            )))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = get_env();
    let app_config = AppConfig::load(&env)?;
    let _log_guard = init_logging(&app_config);

    tracing::info!(
        env = %env,
        version = env!("GIT_HASH"),
        backend = ?app_config.storage.backend,
        base_currency = ?app_config.currency.base_currency.map(|c| c.get()),
        "Starting Payment Ledger"
    );

    let ledger = build_ledger(&app_config).await?;
    gateway::run_server(&app_config.gateway, ledger).await
}
