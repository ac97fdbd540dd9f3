use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::currency::{Currency, PublishedRate};

/// Create ledger tables if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing PostgreSQL schema...");

    for (name, ddl) in [
        ("accounts_tb", CREATE_ACCOUNTS_TABLE),
        ("payments_tb", CREATE_PAYMENTS_TABLE),
        ("payments_tb index", CREATE_PAYMENTS_INDEX),
        ("currencies_tb", CREATE_CURRENCIES_TABLE),
        ("exchange_rates_tb", CREATE_EXCHANGE_RATES_TABLE),
    ] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {}", name))?;
    }

    tracing::info!("PostgreSQL schema initialized successfully");
    Ok(())
}

/// Upsert configured currencies and insert configured rates.
///
/// Rates are appended with `valid_from = NOW()` only when the newest published
/// factor for the pair differs, so restarts do not grow the table.
pub async fn seed_reference_data(
    pool: &PgPool,
    currencies: &[Currency],
    rates: &[PublishedRate],
) -> Result<()> {
    for c in currencies {
        sqlx::query(
            r#"INSERT INTO currencies_tb (numeric_code, alpha_code, name)
               VALUES ($1, $2, $3)
               ON CONFLICT (numeric_code)
               DO UPDATE SET alpha_code = EXCLUDED.alpha_code, name = EXCLUDED.name"#,
        )
        .bind(c.code.as_i32())
        .bind(&c.alpha)
        .bind(&c.name)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed currency {}", c.code))?;
    }

    for r in rates {
        sqlx::query(
            r#"INSERT INTO exchange_rates_tb (from_currency, to_currency, rate, valid_from)
               SELECT $1, $2, $3, NOW()
               WHERE NOT EXISTS (
                   SELECT 1 FROM (
                       SELECT rate FROM exchange_rates_tb
                       WHERE from_currency = $1 AND to_currency = $2 AND valid_from <= NOW()
                       ORDER BY valid_from DESC LIMIT 1
                   ) latest
                   WHERE latest.rate = $3
               )"#,
        )
        .bind(r.from.as_i32())
        .bind(r.to.as_i32())
        .bind(r.rate)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to seed rate {} -> {}", r.from, r.to))?;
    }

    tracing::info!(
        currencies = currencies.len(),
        rates = rates.len(),
        "Reference data seeded"
    );
    Ok(())
}

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    account_id    UUID PRIMARY KEY,
    currency_code INTEGER NOT NULL CHECK (currency_code BETWEEN 1 AND 999),
    balance       NUMERIC(20, 2) NOT NULL CHECK (balance > 0),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_PAYMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS payments_tb (
    payment_id    UUID PRIMARY KEY,
    from_account  UUID NOT NULL REFERENCES accounts_tb (account_id),
    to_account    UUID NOT NULL REFERENCES accounts_tb (account_id),
    currency_code INTEGER NOT NULL CHECK (currency_code BETWEEN 1 AND 999),
    amount        NUMERIC NOT NULL CHECK (amount > 0),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
    seq           BIGSERIAL NOT NULL
)
"#;

const CREATE_PAYMENTS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS payments_from_account_idx
    ON payments_tb (from_account, created_at, seq)
"#;

const CREATE_CURRENCIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS currencies_tb (
    numeric_code INTEGER PRIMARY KEY CHECK (numeric_code BETWEEN 1 AND 999),
    alpha_code   TEXT NOT NULL,
    name         TEXT NOT NULL
)
"#;

const CREATE_EXCHANGE_RATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS exchange_rates_tb (
    from_currency INTEGER NOT NULL,
    to_currency   INTEGER NOT NULL,
    rate          NUMERIC NOT NULL CHECK (rate > 0),
    valid_from    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    PRIMARY KEY (from_currency, to_currency, valid_from)
)
"#;
