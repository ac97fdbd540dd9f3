//! Storage engines and the unit of work
//!
//! A [`Storage`] opens units of work and hands out the account and payment
//! stores that operate inside them. Two engines implement it:
//!
//! - [`postgres::PgStorage`]: sqlx transactions, `SELECT ... FOR UPDATE` row locks
//! - [`memory::MemoryStorage`]: in-process tables with one async mutex per row
//!
//! Both give the same contract: a locked read blocks while another unit of
//! work holds the row, and every lock plus every staged write is released
//! together at commit or rollback (or when the unit of work is dropped).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::account::AccountStore;
use crate::core_types::AccountId;
use crate::payment::PaymentStore;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// PostgreSQL SQLSTATE codes reported as retryable conflicts
pub mod sqlstate {
    pub const LOCK_NOT_AVAILABLE: &str = "55P03";
    pub const SERIALIZATION_FAILURE: &str = "40001";
    pub const DEADLOCK_DETECTED: &str = "40P01";
}

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Balance must be positive and at most {max}, got {0}", max = crate::money::MAX_BALANCE)]
    InvalidBalance(Decimal),

    #[error("Concurrency conflict: {0}")]
    Conflict(String),

    #[error("Account {0} is not locked by this unit of work")]
    NotLocked(AccountId),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let conflict = e
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| {
                matches!(
                    code.as_ref(),
                    sqlstate::LOCK_NOT_AVAILABLE
                        | sqlstate::SERIALIZATION_FAILURE
                        | sqlstate::DEADLOCK_DETECTED
                )
            });
        if conflict {
            StoreError::Conflict(e.to_string())
        } else {
            StoreError::Database(e)
        }
    }
}

/// An open atomic unit of work.
///
/// Dropping it without calling [`commit`](UnitOfWork::commit) rolls it back.
#[async_trait]
pub trait UnitOfWork: Send + Sized {
    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

/// Injected storage engine
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    type Tx: UnitOfWork + 'static;
    type Accounts: AccountStore<Self::Tx>;
    type Payments: PaymentStore<Self::Tx>;

    /// Open a new unit of work
    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    fn accounts(&self) -> &Self::Accounts;

    fn payments(&self) -> &Self::Payments;

    /// Liveness check behind `GET /health`
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Offset/limit window for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 50;
    pub const MAX_LIMIT: u32 = 1000;

    /// Build a page; `limit` is capped at [`Page::MAX_LIMIT`]
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.min(Self::MAX_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
