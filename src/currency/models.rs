use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::CurrencyCode;

/// Currency reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    /// ISO 4217 alphabetic code, e.g. "UAH"
    pub alpha: String,
    pub name: String,
}

/// Published conversion factor: 1 unit of `from` buys `rate` units of `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
}
