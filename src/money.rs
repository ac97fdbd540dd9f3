//! Money Module
//!
//! All balance arithmetic goes through this module.
//!
//! ## Rules
//! 1. Balances carry exactly `BALANCE_SCALE` (2) fractional digits
//! 2. Rounding is half-up (midpoint away from zero), never banker's rounding
//! 3. Client amounts arrive as strings and are parsed strictly
//!
//! ## Usage
//! ```rust
//! use payment_ledger::money::{parse_amount, round_balance};
//! use rust_decimal::Decimal;
//!
//! let amount = parse_amount("950.556").unwrap();
//! assert_eq!(round_balance(amount), Decimal::new(95056, 2));
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

/// Fractional digits kept on every persisted balance
pub const BALANCE_SCALE: u32 = 2;

/// Largest storable balance, `999999999999999999.99` (the `NUMERIC(20, 2)` column bound)
pub const MAX_BALANCE: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

/// Money parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount must be positive")]
    NotPositive,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Balance exceeds the maximum of {}", MAX_BALANCE)]
    OutOfRange,
}

/// Round to balance precision, half-up.
///
/// `950.556 -> 950.56`, `0.005 -> 0.01`, `-0.005 -> -0.01`
pub fn round_balance(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(BALANCE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when the value is strictly greater than zero
#[inline]
pub fn is_positive(value: Decimal) -> bool {
    value > Decimal::ZERO
}

/// True when the value is a storable balance: `0 < value <= MAX_BALANCE`
#[inline]
pub fn is_valid_balance(value: Decimal) -> bool {
    is_positive(value) && value <= MAX_BALANCE
}

/// Render a balance with exactly `BALANCE_SCALE` fractional digits (`10307` -> `"10307.00"`)
pub fn format_balance(value: Decimal) -> String {
    let mut rounded = round_balance(value);
    rounded.rescale(BALANCE_SCALE);
    rounded.to_string()
}

/// Parse a client decimal string
///
/// Rejects `.5`, `5.`, signs, exponents and empty input. Does not check sign
/// of the result beyond the leading character; use [`parse_amount`] for
/// strictly positive amounts.
pub fn parse_decimal(raw: &str) -> Result<Decimal, MoneyError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if raw.starts_with('-') || raw.starts_with('+') {
        return Err(MoneyError::NotPositive);
    }

    let mut parts = raw.split('.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    if parts.next().is_some() {
        return Err(MoneyError::InvalidFormat("multiple decimal points".into()));
    }
    if whole.is_empty() {
        return Err(MoneyError::InvalidFormat(
            "missing leading zero (e.g., use 0.5 instead of .5)".into(),
        ));
    }
    if frac.is_some_and(str::is_empty) {
        return Err(MoneyError::InvalidFormat(
            "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
        ));
    }
    let all_digits = whole.bytes().all(|b| b.is_ascii_digit())
        && frac.is_none_or(|f| f.bytes().all(|b| b.is_ascii_digit()));
    if !all_digits {
        return Err(MoneyError::InvalidFormat(format!("not a decimal: {}", raw)));
    }

    Decimal::from_str(raw).map_err(|e| MoneyError::InvalidFormat(e.to_string()))
}

/// Parse a strictly positive client amount (kept at full submitted precision)
pub fn parse_amount(raw: &str) -> Result<Decimal, MoneyError> {
    let amount = parse_decimal(raw)?;
    if !is_positive(amount) {
        return Err(MoneyError::NotPositive);
    }
    Ok(amount)
}

/// Parse an opening balance: rounded to balance precision, then required > 0.
///
/// `"0.004"` rounds to zero and is rejected, as is anything above [`MAX_BALANCE`].
pub fn parse_balance(raw: &str) -> Result<Decimal, MoneyError> {
    let balance = round_balance(parse_decimal(raw)?);
    if !is_positive(balance) {
        return Err(MoneyError::NotPositive);
    }
    if balance > MAX_BALANCE {
        return Err(MoneyError::OutOfRange);
    }
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_balance(dec("950.556")), dec("950.56"));
        assert_eq!(round_balance(dec("950.555")), dec("950.56"));
        assert_eq!(round_balance(dec("950.554")), dec("950.55"));
        assert_eq!(round_balance(dec("0.005")), dec("0.01"));
        assert_eq!(round_balance(dec("125.99")), dec("125.99"));
        assert_eq!(round_balance(dec("-0.005")), dec("-0.01"));
    }

    #[test]
    fn test_round_half_up_not_bankers() {
        // Banker's rounding would give 0.02 for 0.025 but 0.04 for 0.035
        assert_eq!(round_balance(dec("0.025")), dec("0.03"));
        assert_eq!(round_balance(dec("0.035")), dec("0.04"));
    }

    #[test]
    fn test_format_balance_fixed_scale() {
        assert_eq!(format_balance(dec("10307")), "10307.00");
        assert_eq!(format_balance(dec("9874.01")), "9874.01");
        assert_eq!(format_balance(dec("49.4")), "49.40");
        assert_eq!(format_balance(dec("0.005")), "0.01");
    }

    #[test]
    fn test_parse_amount_valid() {
        assert_eq!(parse_amount("950.556"), Ok(dec("950.556")));
        assert_eq!(parse_amount("10"), Ok(dec("10")));
        assert_eq!(parse_amount(" 0.01 "), Ok(dec("0.01")));
    }

    #[test]
    fn test_parse_amount_rejects_non_positive() {
        assert_eq!(parse_amount("0"), Err(MoneyError::NotPositive));
        assert_eq!(parse_amount("0.000"), Err(MoneyError::NotPositive));
        assert_eq!(parse_amount("-1"), Err(MoneyError::NotPositive));
    }

    #[test]
    fn test_parse_amount_rejects_bad_format() {
        assert!(matches!(parse_amount(""), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount(".5"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("5."), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("1.2.3"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("1e5"), Err(MoneyError::InvalidFormat(_))));
        assert!(matches!(parse_amount("abc"), Err(MoneyError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_balance_rounds_before_positivity_check() {
        assert_eq!(parse_balance("10000"), Ok(dec("10000")));
        assert_eq!(parse_balance("1.005"), Ok(dec("1.01")));
        assert_eq!(parse_balance("0.005"), Ok(dec("0.01")));
        assert_eq!(parse_balance("0.004"), Err(MoneyError::NotPositive));
    }

    #[test]
    fn test_max_balance_bound() {
        assert_eq!(MAX_BALANCE, dec("999999999999999999.99"));
        assert!(is_valid_balance(MAX_BALANCE));
        assert!(!is_valid_balance(MAX_BALANCE + dec("0.01")));
        assert!(!is_valid_balance(Decimal::ZERO));

        assert_eq!(parse_balance("999999999999999999.99"), Ok(MAX_BALANCE));
        assert_eq!(parse_balance("1000000000000000000"), Err(MoneyError::OutOfRange));
        // Rounds up past the bound
        assert_eq!(parse_balance("999999999999999999.995"), Err(MoneyError::OutOfRange));
    }
}
