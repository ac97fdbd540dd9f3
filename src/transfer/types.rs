use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core_types::{AccountId, CurrencyCode};
use crate::error::LedgerError;
use crate::money;

/// One transfer between two accounts.
///
/// `amount` is denominated in `currency_code`, which may differ from both
/// account currencies. It keeps full submitted precision; only the converted
/// debit and credit are rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub currency_code: CurrencyCode,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        from_account: AccountId,
        to_account: AccountId,
        currency_code: CurrencyCode,
        amount: Decimal,
    ) -> Self {
        Self {
            from_account,
            to_account,
            currency_code,
            amount,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if !money::is_positive(self.amount) {
            return Err(LedgerError::validation("Amount must be greater than zero"));
        }
        if self.from_account == self.to_account {
            return Err(LedgerError::validation(
                "Source and destination account cannot be the same",
            ));
        }
        Ok(())
    }

    /// Both account ids in lock acquisition order
    pub fn lock_order(&self) -> [AccountId; 2] {
        if self.from_account <= self.to_account {
            [self.from_account, self.to_account]
        } else {
            [self.to_account, self.from_account]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: Decimal) -> TransferRequest {
        TransferRequest::new(
            AccountId::new(),
            AccountId::new(),
            CurrencyCode::new(980).unwrap(),
            amount,
        )
    }

    #[test]
    fn test_validate_amount() {
        assert!(request(Decimal::new(1, 3)).validate().is_ok());
        assert!(matches!(
            request(Decimal::ZERO).validate(),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            request(Decimal::new(-5, 0)).validate(),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_same_account() {
        let mut req = request(Decimal::ONE);
        req.to_account = req.from_account;
        assert!(matches!(req.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_lock_order_is_ascending_regardless_of_direction() {
        let req = request(Decimal::ONE);
        let reversed = TransferRequest::new(req.to_account, req.from_account, req.currency_code, req.amount);
        let order = req.lock_order();
        assert!(order[0] < order[1]);
        assert_eq!(order, reversed.lock_order());
    }
}
