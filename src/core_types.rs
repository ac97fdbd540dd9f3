//! Core types used throughout the system
//!
//! Identifiers are UUID newtypes so an account id can never be passed where a
//! payment id is expected. Both are totally ordered; the transfer engine relies
//! on `AccountId: Ord` to pick its lock order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account ID - globally unique, immutable after creation.
///
/// # Ordering:
/// `Ord` compares the raw 16 bytes, which matches PostgreSQL's ordering of the
/// `uuid` type. Account listing and lock acquisition both depend on this.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Payment ID - unique per committed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 numeric currency code (e.g. 980 = UAH, 643 = RUB, 933 = BYN).
///
/// # Constraints:
/// - Three digits: 1..=999
/// - Stored as `INTEGER` in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct CurrencyCode(u16);

impl CurrencyCode {
    pub const MAX: u16 = 999;

    pub fn new(code: u16) -> Option<Self> {
        (1..=Self::MAX).contains(&code).then_some(Self(code))
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    /// Column value for PostgreSQL
    #[inline]
    pub fn as_i32(&self) -> i32 {
        self.0 as i32
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

impl TryFrom<u16> for CurrencyCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        CurrencyCode::new(value)
            .ok_or_else(|| format!("currency code must be within 1..=999, got {}", value))
    }
}

impl TryFrom<i32> for CurrencyCode {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u16::try_from(value)
            .map_err(|_| format!("currency code must be within 1..=999, got {}", value))
            .and_then(CurrencyCode::try_from)
    }
}

impl From<CurrencyCode> for u16 {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_range() {
        assert!(CurrencyCode::new(0).is_none());
        assert!(CurrencyCode::new(1000).is_none());
        assert_eq!(CurrencyCode::new(980).map(|c| c.get()), Some(980));
        assert!(CurrencyCode::try_from(-1i32).is_err());
        assert_eq!(CurrencyCode::try_from(643i32).map(|c| c.as_i32()), Ok(643));
    }

    #[test]
    fn test_currency_code_display_pads() {
        let code = CurrencyCode::new(8).unwrap();
        assert_eq!(code.to_string(), "008");
    }

    #[test]
    fn test_currency_code_serde_rejects_out_of_range() {
        let ok: Result<CurrencyCode, _> = serde_json::from_str("933");
        assert!(ok.is_ok());
        let bad: Result<CurrencyCode, _> = serde_json::from_str("1000");
        assert!(bad.is_err());
    }

    #[test]
    fn test_account_id_roundtrip_and_order() {
        let a: AccountId = "00000000-0000-0000-0000-000000000001".parse().unwrap();
        let b: AccountId = "00000000-0000-0000-0000-000000000002".parse().unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "00000000-0000-0000-0000-000000000001");
        assert!("not-a-uuid".parse::<AccountId>().is_err());
    }
}
