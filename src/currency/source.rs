//! Rate sources: where published factors come from

use async_trait::async_trait;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{PgPool, Row};

use super::models::{Currency, PublishedRate};
use crate::core_types::CurrencyCode;
use crate::store::StoreError;

/// Lookup of published factors and currency reference data.
///
/// A source answers only for the exact ordered pair it was asked about; the
/// resolution policy (inverse, triangulation) lives in the converter.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Current published factor for `from -> to`, if any
    async fn published_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Option<Decimal>, StoreError>;

    /// Known currencies ordered by numeric code
    async fn currencies(&self) -> Result<Vec<Currency>, StoreError>;
}

/// Fixed table loaded from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticRateSource {
    rates: FxHashMap<(CurrencyCode, CurrencyCode), Decimal>,
    currencies: Vec<Currency>,
}

impl StaticRateSource {
    pub fn new(currencies: Vec<Currency>, rates: Vec<PublishedRate>) -> Self {
        let mut currencies = currencies;
        currencies.sort_by_key(|c| c.code);
        currencies.dedup_by_key(|c| c.code);
        Self {
            rates: rates
                .into_iter()
                .map(|r| ((r.from, r.to), r.rate))
                .collect(),
            currencies,
        }
    }

    /// Publish or replace one factor
    pub fn with_rate(mut self, from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }
}

#[async_trait]
impl RateSource for StaticRateSource {
    async fn published_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Option<Decimal>, StoreError> {
        Ok(self.rates.get(&(from, to)).copied())
    }

    async fn currencies(&self) -> Result<Vec<Currency>, StoreError> {
        Ok(self.currencies.clone())
    }
}

/// `exchange_rates_tb` / `currencies_tb` reader.
///
/// The newest row whose `valid_from` is not in the future is the current
/// factor for a pair.
#[derive(Clone)]
pub struct PgRateSource {
    pool: PgPool,
}

impl PgRateSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateSource for PgRateSource {
    async fn published_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Option<Decimal>, StoreError> {
        let rate = sqlx::query_scalar::<_, Decimal>(
            r#"SELECT rate FROM exchange_rates_tb
               WHERE from_currency = $1 AND to_currency = $2 AND valid_from <= NOW()
               ORDER BY valid_from DESC
               LIMIT 1"#,
        )
        .bind(from.as_i32())
        .bind(to.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    async fn currencies(&self) -> Result<Vec<Currency>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT numeric_code, alpha_code, name
               FROM currencies_tb ORDER BY numeric_code ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut currencies = Vec::with_capacity(rows.len());
        for row in rows {
            let code: i32 = row.try_get("numeric_code")?;
            let Ok(code) = CurrencyCode::try_from(code) else {
                tracing::warn!(numeric_code = code, "Skipping currency with invalid code");
                continue;
            };
            currencies.push(Currency {
                code,
                alpha: row.try_get("alpha_code")?,
                name: row.try_get("name")?,
            });
        }
        Ok(currencies)
    }
}
