//! Payment record types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, CurrencyCode, PaymentId};

/// Immutable record of one committed transfer.
///
/// `currency_code` and `amount` are exactly what the caller submitted, not the
/// converted debit or credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub currency_code: CurrencyCode,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Payment insert input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub currency_code: CurrencyCode,
    pub amount: Decimal,
}

impl NewPayment {
    pub fn into_payment(self, id: PaymentId, created_at: DateTime<Utc>) -> Payment {
        Payment {
            id,
            from_account: self.from_account,
            to_account: self.to_account,
            currency_code: self.currency_code,
            amount: self.amount,
            created_at,
        }
    }
}
