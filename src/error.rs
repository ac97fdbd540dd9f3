//! Ledger error taxonomy
//!
//! Every core operation returns [`LedgerError`]. Lower layers keep their own
//! error types and are folded in through `From`.

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::core_types::{AccountId, CurrencyCode};
use crate::currency::RateError;
use crate::money::MoneyError;
use crate::store::StoreError;

/// Coarse error category exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("No exchange rate available from {from} to {to}")]
    RateUnavailable { from: CurrencyCode, to: CurrencyCode },

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Concurrent update in progress, retry the request")]
    ConcurrencyConflict,

    /// Detail is for logs only
    #[error("Internal storage error")]
    PersistenceFailure(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Validation(_)
            | LedgerError::RateUnavailable { .. }
            | LedgerError::InsufficientFunds => ErrorKind::Validation,
            LedgerError::AccountNotFound(_) => ErrorKind::NotFound,
            LedgerError::ConcurrencyConflict => ErrorKind::Conflict,
            LedgerError::PersistenceFailure(_) => ErrorKind::Internal,
        }
    }

    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) => "VALIDATION_ERROR",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            LedgerError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            LedgerError::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            LedgerError::PersistenceFailure(_) => "PERSISTENCE_FAILURE",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrencyConflict)
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound(id) => LedgerError::AccountNotFound(id),
            err @ StoreError::InvalidBalance(_) => LedgerError::Validation(err.to_string()),
            StoreError::Conflict(detail) => {
                tracing::warn!(%detail, "Storage conflict");
                LedgerError::ConcurrencyConflict
            }
            other => {
                tracing::error!(error = %other, "Persistence failure");
                LedgerError::PersistenceFailure(other.to_string())
            }
        }
    }
}

impl From<RateError> for LedgerError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::Unavailable { from, to } => LedgerError::RateUnavailable { from, to },
            RateError::Overflow => LedgerError::validation("Amount out of range"),
            RateError::Store(e) => e.into(),
        }
    }
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}
