//! Conversion factor resolution
//!
//! Resolution order for `rate(from, to)`:
//! 1. identity pair: factor 1, no lookup
//! 2. direct published factor `from -> to`
//! 3. inverse of published `to -> from` (1 / r, full precision)
//! 4. one hop through the configured base currency, each leg resolved by 2 or 3
//!
//! Non-positive published factors are treated as absent. Factors are never
//! rounded; only converted amounts are rounded to the balance scale.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::source::RateSource;
use crate::core_types::CurrencyCode;
use crate::money;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("No exchange rate available from {from} to {to}")]
    Unavailable { from: CurrencyCode, to: CurrencyCode },

    #[error("Converted amount out of range")]
    Overflow,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Currency conversion capability used by the transfer engine
#[async_trait]
pub trait CurrencyConversion: Send + Sync {
    /// Factor such that `amount_in_from * factor = amount_in_to`; always > 0
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError>;

    /// Convert and round half-up to 2 fractional digits
    async fn convert(
        &self,
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Decimal, RateError> {
        let factor = self.rate(from, to).await?;
        let raw = amount.checked_mul(factor).ok_or(RateError::Overflow)?;
        Ok(money::round_balance(raw))
    }
}

pub struct CurrencyConverter {
    source: Arc<dyn RateSource>,
    base: Option<CurrencyCode>,
}

impl CurrencyConverter {
    pub fn new(source: Arc<dyn RateSource>, base: Option<CurrencyCode>) -> Self {
        Self { source, base }
    }

    /// Direct or inverse factor for one leg
    async fn leg(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Option<Decimal>, RateError> {
        if from == to {
            return Ok(Some(Decimal::ONE));
        }

        if let Some(r) = self.source.published_rate(from, to).await? {
            if money::is_positive(r) {
                return Ok(Some(r));
            }
            tracing::warn!(%from, %to, rate = %r, "Ignoring non-positive published rate");
        }

        if let Some(r) = self.source.published_rate(to, from).await? {
            if money::is_positive(r) {
                return Ok(Decimal::ONE.checked_div(r).filter(|f| money::is_positive(*f)));
            }
            tracing::warn!(from = %to, to = %from, rate = %r, "Ignoring non-positive published rate");
        }

        Ok(None)
    }
}

#[async_trait]
impl CurrencyConversion for CurrencyConverter {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        if let Some(factor) = self.leg(from, to).await? {
            return Ok(factor);
        }

        if let Some(base) = self.base.filter(|b| *b != from && *b != to) {
            let first = self.leg(from, base).await?;
            let second = self.leg(base, to).await?;
            if let (Some(a), Some(b)) = (first, second) {
                let factor = a.checked_mul(b).ok_or(RateError::Overflow)?;
                if money::is_positive(factor) {
                    tracing::debug!(%from, %to, %base, %factor, "Triangulated rate via base currency");
                    return Ok(factor);
                }
            }
        }

        Err(RateError::Unavailable { from, to })
    }
}
