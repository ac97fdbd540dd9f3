//! Ledger service facade
//!
//! [`Ledger`] is the object-safe surface the HTTP gateway talks to, so the
//! gateway stays independent of the storage engine type.

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::info;

use crate::account::{Account, AccountStore, NewAccount};
use crate::core_types::{AccountId, CurrencyCode, PaymentId};
use crate::currency::{Currency, CurrencyConverter, RateSource};
use crate::error::LedgerError;
use crate::payment::{Payment, PaymentStore};
use crate::store::{Page, Storage};
use crate::transfer::{TransferEngine, TransferRequest};

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Open an account; the balance is rounded half-up to 2 digits and must stay > 0
    async fn create_account(
        &self,
        currency_code: CurrencyCode,
        balance: Decimal,
    ) -> Result<AccountId, LedgerError>;

    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, LedgerError>;

    /// Execute a transfer and record it
    async fn create_payment(&self, req: TransferRequest) -> Result<PaymentId, LedgerError>;

    /// Payments originating from the account, oldest first
    async fn list_payments(&self, account_id: AccountId) -> Result<Vec<Payment>, LedgerError>;

    async fn list_currencies(&self) -> Result<Vec<Currency>, LedgerError>;

    async fn health_check(&self) -> Result<(), LedgerError>;
}

pub struct LedgerService<S: Storage> {
    engine: TransferEngine<S>,
    rates: Arc<dyn RateSource>,
}

impl<S: Storage> LedgerService<S> {
    /// Wire the storage engine and rate source into one service.
    ///
    /// `base_currency` enables triangulation for pairs without a direct or
    /// inverse published factor.
    pub fn new(
        storage: Arc<S>,
        rates: Arc<dyn RateSource>,
        base_currency: Option<CurrencyCode>,
    ) -> Self {
        let converter = CurrencyConverter::new(Arc::clone(&rates), base_currency);
        Self {
            engine: TransferEngine::new(storage, Arc::new(converter)),
            rates,
        }
    }

    pub fn storage(&self) -> &Arc<S> {
        self.engine.storage()
    }
}

#[async_trait]
impl<S: Storage> Ledger for LedgerService<S> {
    async fn create_account(
        &self,
        currency_code: CurrencyCode,
        balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let new_account = NewAccount::new(currency_code, balance);
        let opening = new_account.balance;
        let id = self.storage().accounts().create(new_account).await?;
        info!(account_id = %id, currency = %currency_code, balance = %opening, "Account created");
        Ok(id)
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        Ok(self.storage().accounts().get(id).await?)
    }

    async fn list_accounts(&self, page: Page) -> Result<Vec<Account>, LedgerError> {
        Ok(self.storage().accounts().list(page).await?)
    }

    async fn create_payment(&self, req: TransferRequest) -> Result<PaymentId, LedgerError> {
        self.engine.execute(req).await
    }

    async fn list_payments(&self, account_id: AccountId) -> Result<Vec<Payment>, LedgerError> {
        Ok(self.storage().payments().list_by_account(account_id).await?)
    }

    async fn list_currencies(&self) -> Result<Vec<Currency>, LedgerError> {
        Ok(self.rates.currencies().await?)
    }

    async fn health_check(&self) -> Result<(), LedgerError> {
        Ok(self.storage().health_check().await?)
    }
}
