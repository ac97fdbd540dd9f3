//! Payment Ledger - multi-currency account ledger
//!
//! Accounts hold a single currency and a strictly positive balance. A transfer
//! locks both accounts, converts the requested amount into each account's
//! currency, and commits both balance changes together with an immutable
//! payment record as one unit of work.
//!
//! # Modules
//!
//! - [`core_types`] - Identifier and currency code newtypes
//! - [`money`] - Decimal parsing, rounding and formatting
//! - [`account`] - Account model and store
//! - [`payment`] - Payment model and store
//! - [`store`] - Storage engines (PostgreSQL, in-process) and the unit of work
//! - [`currency`] - Rate sources and the conversion policy
//! - [`transfer`] - The transfer engine
//! - [`service`] - Ledger facade used by the gateway
//! - [`gateway`] - HTTP API

// Core types - must be first!
pub mod core_types;

pub mod config;
pub mod error;
pub mod logging;
pub mod money;

// Persistence
pub mod account;
pub mod db;
pub mod payment;
pub mod store;

// Domain
pub mod currency;
pub mod service;
pub mod transfer;

// HTTP
pub mod gateway;

// Convenient re-exports at crate root
pub use account::{Account, NewAccount};
pub use core_types::{AccountId, CurrencyCode, PaymentId};
pub use currency::{CurrencyConversion, CurrencyConverter, RateSource, StaticRateSource};
pub use error::{ErrorKind, LedgerError};
pub use payment::Payment;
pub use service::{Ledger, LedgerService};
pub use store::{MemoryStorage, Page, PgStorage, Storage};
pub use transfer::{TransferEngine, TransferRequest};
