//! Property-based tests for the conversion policy
//!
//! - Round-trip: A -> B -> A through the inverse factor stays within rounding tolerance
//! - Rounding: converted amounts carry at most 2 digits and sit within 0.005 of the exact product
//! - Fallback: direct, then inverse, then one hop through the base currency, else unavailable

use std::sync::Arc;

use payment_ledger::currency::RateError;
use payment_ledger::{CurrencyCode, CurrencyConversion, CurrencyConverter, StaticRateSource};
use proptest::prelude::*;
use rust_decimal::Decimal;

const UAH: u16 = 980;
const RUB: u16 = 643;
const BYN: u16 = 933;

fn code(n: u16) -> CurrencyCode {
    CurrencyCode::new(n).unwrap()
}

/// Strategy for generating valid amounts (positive, up to 3 fractional digits)
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000_000i64).prop_map(|milli| Decimal::new(milli, 3))
}

/// Strategy for generating published factors between 0.0001 and 1000
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|r| Decimal::new(r, 4))
}

fn converter(source: StaticRateSource, base: Option<u16>) -> CurrencyConverter {
    CurrencyConverter::new(Arc::new(source), base.map(code))
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: converting there and back via the inverse factor loses at most
    /// the two roundings, the first scaled back by 1/rate
    #[test]
    fn prop_round_trip_within_rounding_tolerance(
        cents in 1i64..1_000_000_000i64,
        rate in rate_strategy(),
    ) {
        let amount = Decimal::new(cents, 2);
        let c = converter(StaticRateSource::default().with_rate(code(BYN), code(UAH), rate), None);

        let (there, back) = block_on(async {
            let there = c.convert(amount, code(BYN), code(UAH)).await.unwrap();
            let back = c.convert(there, code(UAH), code(BYN)).await.unwrap();
            (there, back)
        });

        let half_cent = Decimal::new(5, 3);
        let tolerance = half_cent + half_cent / rate + Decimal::new(1, 12);
        prop_assume!(there > Decimal::ZERO);
        prop_assert!(
            (back - amount).abs() <= tolerance,
            "{} -> {} -> {} at rate {}", amount, there, back, rate
        );
        if rate >= Decimal::ONE {
            prop_assert!((back - amount).abs() <= Decimal::new(1, 2));
        }
    }

    /// Property: converted amounts are rounded half-up to exactly 2 digits
    #[test]
    fn prop_convert_rounds_to_two_places(amount in amount_strategy(), rate in rate_strategy()) {
        let c = converter(StaticRateSource::default().with_rate(code(BYN), code(RUB), rate), None);
        let converted = block_on(c.convert(amount, code(BYN), code(RUB))).unwrap();

        let exact = amount * rate;
        prop_assert!(converted.scale() <= 2);
        prop_assert!((converted - exact).abs() <= Decimal::new(5, 3));
        // Half-up: a remainder of exactly half a cent always rounds away from zero
        if (exact * Decimal::ONE_HUNDRED).fract() == Decimal::new(5, 1) {
            prop_assert!(converted > exact);
        }
    }

    /// Property: the identity pair never consults the source and only rounds
    #[test]
    fn prop_identity_only_rounds(amount in amount_strategy(), n in 1u16..=999u16) {
        let c = converter(StaticRateSource::default(), None);
        let converted = block_on(c.convert(amount, code(n), code(n))).unwrap();
        prop_assert_eq!(
            converted,
            amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        );
    }

    /// Property: with a base currency, a pair with neither direct nor inverse
    /// factor resolves to the product of the two legs; without one it is unavailable
    #[test]
    fn prop_triangulation_fallback(to_base in rate_strategy(), from_base in rate_strategy()) {
        // UAH -> BYN published as inverse (BYN -> UAH), BYN -> RUB direct
        let source = StaticRateSource::default()
            .with_rate(code(BYN), code(UAH), to_base)
            .with_rate(code(BYN), code(RUB), from_base);

        let with_base = converter(source.clone(), Some(BYN));
        let factor = block_on(with_base.rate(code(UAH), code(RUB))).unwrap();
        prop_assert_eq!(factor, (Decimal::ONE / to_base) * from_base);
        prop_assert!(factor > Decimal::ZERO);

        let without_base = converter(source, None);
        let missing = block_on(without_base.rate(code(UAH), code(RUB)));
        prop_assert!(matches!(missing, Err(RateError::Unavailable { .. })), "expected RateError::Unavailable, got {:?}", missing);
    }

    /// Property: a direct factor always wins over the inverse of the reverse pair
    #[test]
    fn prop_direct_preferred_over_inverse(direct in rate_strategy(), reverse in rate_strategy()) {
        let source = StaticRateSource::default()
            .with_rate(code(UAH), code(RUB), direct)
            .with_rate(code(RUB), code(UAH), reverse);
        let c = converter(source, Some(BYN));
        prop_assert_eq!(block_on(c.rate(code(UAH), code(RUB))).unwrap(), direct);
        prop_assert_eq!(block_on(c.rate(code(RUB), code(UAH))).unwrap(), reverse);
    }
}
