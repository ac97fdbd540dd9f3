//! Transfer engine
//!
//! A transfer first prices both legs against committed state, then runs one
//! unit of work: lock both accounts in ascending id order, validate, write
//! both balances and the payment row, commit. Any error rolls the whole unit
//! back; dropping the future mid-flight does too.
//!
//! Pricing happens before any row lock is taken. An account's currency never
//! changes, so the factors stay valid once the rows are locked, and a rate
//! lookup that needs its own connection never waits while holding locks.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::types::TransferRequest;
use crate::account::{Account, AccountStore};
use crate::core_types::PaymentId;
use crate::currency::CurrencyConversion;
use crate::error::LedgerError;
use crate::money;
use crate::payment::{NewPayment, PaymentStore};
use crate::store::{Storage, UnitOfWork};

/// Both legs of a transfer in account currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Legs {
    debit: Decimal,
    credit: Decimal,
}

pub struct TransferEngine<S: Storage> {
    storage: Arc<S>,
    converter: Arc<dyn CurrencyConversion>,
}

impl<S: Storage> Clone for TransferEngine<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            converter: Arc::clone(&self.converter),
        }
    }
}

impl<S: Storage> TransferEngine<S> {
    pub fn new(storage: Arc<S>, converter: Arc<dyn CurrencyConversion>) -> Self {
        Self { storage, converter }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Execute a transfer atomically and return the new payment id
    pub async fn execute(&self, req: TransferRequest) -> Result<PaymentId, LedgerError> {
        // 1. Validation
        req.validate()?;

        // 2. Price both legs outside the unit of work
        let legs = match self.price(&req).await {
            Ok(legs) => legs,
            Err(err) => {
                warn!(
                    from = %req.from_account,
                    to = %req.to_account,
                    code = err.code(),
                    error = %err,
                    "Transfer rejected before locking"
                );
                return Err(err);
            }
        };

        // 3. Transaction
        let mut tx = self.storage.begin().await?;

        match self.apply(&mut tx, &req, legs).await {
            Ok(payment_id) => {
                tx.commit().await?;
                info!(
                    %payment_id,
                    from = %req.from_account,
                    to = %req.to_account,
                    currency = %req.currency_code,
                    amount = %req.amount,
                    debit = %legs.debit,
                    credit = %legs.credit,
                    "Transfer committed"
                );
                Ok(payment_id)
            }
            Err(err) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "Rollback failed, unit of work discarded");
                }
                warn!(
                    from = %req.from_account,
                    to = %req.to_account,
                    code = err.code(),
                    error = %err,
                    "Transfer rejected"
                );
                Err(err)
            }
        }
    }

    /// Convert the request amount independently into each account currency
    async fn price(&self, req: &TransferRequest) -> Result<Legs, LedgerError> {
        let accounts = self.storage.accounts();
        let source = accounts.get(req.from_account).await?;
        let destination = accounts.get(req.to_account).await?;

        let debit = self
            .converter
            .convert(req.amount, req.currency_code, source.currency_code)
            .await?;
        let credit = self
            .converter
            .convert(req.amount, req.currency_code, destination.currency_code)
            .await?;
        if !money::is_positive(debit) || !money::is_positive(credit) {
            return Err(LedgerError::validation(
                "Amount is too small to transfer after conversion",
            ));
        }

        debug!(%debit, %credit, "Transfer priced");
        Ok(Legs { debit, credit })
    }

    async fn apply(
        &self,
        tx: &mut S::Tx,
        req: &TransferRequest,
        legs: Legs,
    ) -> Result<PaymentId, LedgerError> {
        let accounts = self.storage.accounts();

        // Lock in ascending id order so opposite-direction transfers cannot deadlock
        let [first_id, second_id] = req.lock_order();
        let first = accounts.get_locked(tx, first_id).await?;
        let second = accounts.get_locked(tx, second_id).await?;
        let (mut source, mut destination) = if first_id == req.from_account {
            (first, second)
        } else {
            (second, first)
        };

        // 4. Source must stay strictly positive, destination within range
        source.balance = debit_balance(&source, legs.debit)?;
        destination.balance = credit_balance(&destination, legs.credit)?;

        // 5. Persist both balances and the payment row
        accounts.update(tx, &source).await?;
        accounts.update(tx, &destination).await?;

        let payment_id = self
            .storage
            .payments()
            .insert(
                tx,
                NewPayment {
                    from_account: req.from_account,
                    to_account: req.to_account,
                    currency_code: req.currency_code,
                    amount: req.amount,
                },
            )
            .await?;

        Ok(payment_id)
    }
}

fn debit_balance(source: &Account, debit: Decimal) -> Result<Decimal, LedgerError> {
    match source.balance.checked_sub(debit) {
        Some(remaining) if money::is_positive(remaining) => Ok(remaining),
        _ => Err(LedgerError::InsufficientFunds),
    }
}

fn credit_balance(destination: &Account, credit: Decimal) -> Result<Decimal, LedgerError> {
    match destination.balance.checked_add(credit) {
        Some(total) if total <= money::MAX_BALANCE => Ok(total),
        _ => Err(LedgerError::validation(format!(
            "Destination balance would exceed the maximum of {}",
            money::MAX_BALANCE
        ))),
    }
}
