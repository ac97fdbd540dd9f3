//! Currency reference data and conversion

pub mod converter;
pub mod models;
pub mod source;

pub use converter::{CurrencyConversion, CurrencyConverter, RateError};
pub use models::{Currency, PublishedRate};
pub use source::{PgRateSource, RateSource, StaticRateSource};
