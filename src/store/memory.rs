//! In-process storage engine
//!
//! Committed tables live behind one `RwLock`. Each account row also owns an
//! async mutex; a unit of work keeps the owned guard for every row it locked
//! and stages its writes locally. Commit applies all staged writes under a
//! single write lock of the tables, then releases the row guards. Dropping a
//! unit of work discards its staged writes and releases its guards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use super::{Page, Storage, StoreError, UnitOfWork};
use crate::account::{Account, AccountStore, NewAccount};
use crate::core_types::{AccountId, PaymentId};
use crate::payment::{NewPayment, Payment, PaymentStore};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    /// Commit order, which is also `created_at` order
    payments: Vec<Payment>,
}

struct Shared {
    tables: RwLock<Tables>,
    row_locks: DashMap<AccountId, Arc<Mutex<()>>>,
    lock_timeout: Duration,
}

/// Unit of work over [`MemoryStorage`]
pub struct MemoryUnitOfWork {
    shared: Arc<Shared>,
    held: FxHashMap<AccountId, OwnedMutexGuard<()>>,
    staged_accounts: FxHashMap<AccountId, Account>,
    staged_payments: Vec<(PaymentId, NewPayment)>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self) -> Result<(), StoreError> {
        let MemoryUnitOfWork {
            shared,
            held,
            staged_accounts,
            staged_payments,
        } = self;

        {
            let mut tables = shared.tables.write().await;
            for (id, account) in staged_accounts {
                tables.accounts.insert(id, account);
            }
            for (id, payment) in staged_payments {
                let created_at = monotonic_now(tables.payments.last().map(|p| p.created_at));
                tables.payments.push(payment.into_payment(id, created_at));
            }
        }

        debug!(rows = held.len(), "Unit of work committed");
        drop(held);
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        debug!(rows = self.held.len(), "Unit of work rolled back");
        Ok(())
    }
}

/// Wall clock, never earlier than the previous payment
fn monotonic_now(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(last) if last > now => last,
        _ => now,
    }
}

/// Account store over the shared tables
#[derive(Clone)]
pub struct MemoryAccountStore {
    shared: Arc<Shared>,
}

#[async_trait]
impl AccountStore<MemoryUnitOfWork> for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let id = AccountId::new();
        let account = account.into_account(id)?;

        let mut tables = self.shared.tables.write().await;
        self.shared.row_locks.insert(id, Arc::new(Mutex::new(())));
        tables.accounts.insert(id, account);
        Ok(id)
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        self.shared
            .tables
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    async fn get_locked(
        &self,
        tx: &mut MemoryUnitOfWork,
        id: AccountId,
    ) -> Result<Account, StoreError> {
        if let Some(staged) = tx.staged_accounts.get(&id) {
            return Ok(staged.clone());
        }

        if !tx.held.contains_key(&id) {
            let row_lock = self
                .shared
                .row_locks
                .get(&id)
                .map(|entry| Arc::clone(entry.value()))
                .ok_or(StoreError::AccountNotFound(id))?;

            let guard = tokio::time::timeout(self.shared.lock_timeout, row_lock.lock_owned())
                .await
                .map_err(|_| {
                    StoreError::Conflict(format!(
                        "lock wait on account {} exceeded {}ms",
                        id,
                        self.shared.lock_timeout.as_millis()
                    ))
                })?;
            tx.held.insert(id, guard);
            debug!(account_id = %id, "Row lock acquired");
        }

        self.get(id).await
    }

    async fn update(
        &self,
        tx: &mut MemoryUnitOfWork,
        account: &Account,
    ) -> Result<(), StoreError> {
        Account::check_balance(account.balance)?;
        if !tx.held.contains_key(&account.id) {
            return Err(StoreError::NotLocked(account.id));
        }
        tx.staged_accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<Account>, StoreError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }
}

/// Payment store over the shared tables
#[derive(Clone)]
pub struct MemoryPaymentStore {
    shared: Arc<Shared>,
}

#[async_trait]
impl PaymentStore<MemoryUnitOfWork> for MemoryPaymentStore {
    async fn insert(
        &self,
        tx: &mut MemoryUnitOfWork,
        payment: NewPayment,
    ) -> Result<PaymentId, StoreError> {
        let id = PaymentId::new();
        tx.staged_payments.push((id, payment));
        Ok(id)
    }

    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Payment>, StoreError> {
        let tables = self.shared.tables.read().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| p.from_account == account_id)
            .cloned()
            .collect())
    }
}

/// In-process [`Storage`]; cloning shares the same tables
#[derive(Clone)]
pub struct MemoryStorage {
    shared: Arc<Shared>,
    accounts: MemoryAccountStore,
    payments: MemoryPaymentStore,
}

impl MemoryStorage {
    pub fn new(lock_timeout: Duration) -> Self {
        let shared = Arc::new(Shared {
            tables: RwLock::new(Tables::default()),
            row_locks: DashMap::new(),
            lock_timeout,
        });
        Self {
            accounts: MemoryAccountStore {
                shared: Arc::clone(&shared),
            },
            payments: MemoryPaymentStore {
                shared: Arc::clone(&shared),
            },
            shared,
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    type Tx = MemoryUnitOfWork;
    type Accounts = MemoryAccountStore;
    type Payments = MemoryPaymentStore;

    async fn begin(&self) -> Result<MemoryUnitOfWork, StoreError> {
        Ok(MemoryUnitOfWork {
            shared: Arc::clone(&self.shared),
            held: FxHashMap::default(),
            staged_accounts: FxHashMap::default(),
            staged_payments: Vec::new(),
        })
    }

    fn accounts(&self) -> &MemoryAccountStore {
        &self.accounts
    }

    fn payments(&self) -> &MemoryPaymentStore {
        &self.payments
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
