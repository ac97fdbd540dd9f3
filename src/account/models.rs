//! Data models for ledger accounts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, CurrencyCode};
use crate::money;
use crate::store::StoreError;

/// Single-currency account with a balance in `(0, MAX_BALANCE]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub currency_code: CurrencyCode,
    pub balance: Decimal,
}

impl Account {
    /// Reject any balance that is zero, negative or above [`money::MAX_BALANCE`]
    pub fn check_balance(balance: Decimal) -> Result<(), StoreError> {
        if money::is_valid_balance(balance) {
            Ok(())
        } else {
            Err(StoreError::InvalidBalance(balance))
        }
    }
}

/// Account creation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub currency_code: CurrencyCode,
    pub balance: Decimal,
}

impl NewAccount {
    /// Opening balance is rounded to balance precision before it is checked
    pub fn new(currency_code: CurrencyCode, balance: Decimal) -> Self {
        Self {
            currency_code,
            balance: money::round_balance(balance),
        }
    }

    pub fn into_account(self, id: AccountId) -> Result<Account, StoreError> {
        Account::check_balance(self.balance)?;
        Ok(Account {
            id,
            currency_code: self.currency_code,
            balance: self.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_check_balance() {
        assert!(Account::check_balance(Decimal::new(1, 2)).is_ok());
        assert!(matches!(
            Account::check_balance(Decimal::ZERO),
            Err(StoreError::InvalidBalance(_))
        ));
        assert!(Account::check_balance(Decimal::new(-5, 0)).is_err());
        assert!(Account::check_balance(money::MAX_BALANCE).is_ok());
        assert!(matches!(
            Account::check_balance(money::MAX_BALANCE + Decimal::new(1, 2)),
            Err(StoreError::InvalidBalance(_))
        ));
    }

    #[test]
    fn test_new_account_rounds_opening_balance() {
        let uah = CurrencyCode::new(980).unwrap();
        let acc = NewAccount::new(uah, Decimal::from_str("10.005").unwrap());
        assert_eq!(acc.balance, Decimal::from_str("10.01").unwrap());

        let tiny = NewAccount::new(uah, Decimal::from_str("0.004").unwrap());
        assert!(tiny.into_account(AccountId::new()).is_err());
    }
}
