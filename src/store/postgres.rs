//! PostgreSQL storage engine
//!
//! A unit of work is one sqlx transaction with `lock_timeout` set locally, so a
//! locked read that waits too long fails with SQLSTATE 55P03 and surfaces as
//! [`StoreError::Conflict`]. Dropping the transaction rolls it back.

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};
use std::time::Duration;
use tracing::debug;

use super::{Storage, StoreError, UnitOfWork};
use crate::account::PgAccountStore;
use crate::db::Database;
use crate::payment::PgPaymentStore;

/// One PostgreSQL transaction
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgUnitOfWork {
    /// Connection bound to this transaction
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        &mut self.tx
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// PostgreSQL-backed [`Storage`]
pub struct PgStorage {
    db: Database,
    accounts: PgAccountStore,
    payments: PgPaymentStore,
    lock_timeout: Duration,
}

impl PgStorage {
    pub fn new(db: Database, lock_timeout: Duration) -> Self {
        let accounts = PgAccountStore::new(db.pool().clone());
        let payments = PgPaymentStore::new(db.pool().clone());
        Self {
            db,
            accounts,
            payments,
            lock_timeout,
        }
    }
}

#[async_trait]
impl Storage for PgStorage {
    type Tx = PgUnitOfWork;
    type Accounts = PgAccountStore;
    type Payments = PgPaymentStore;

    async fn begin(&self) -> Result<PgUnitOfWork, StoreError> {
        let mut tx = self.db.pool().begin().await?;

        // SET does not take bind parameters; the value is an integer we own.
        let stmt = format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout.as_millis());
        sqlx::query(&stmt).execute(&mut *tx).await?;

        debug!(lock_timeout_ms = self.lock_timeout.as_millis() as u64, "Unit of work opened");
        Ok(PgUnitOfWork { tx })
    }

    fn accounts(&self) -> &PgAccountStore {
        &self.accounts
    }

    fn payments(&self) -> &PgPaymentStore {
        &self.payments
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db.health_check().await?;
        Ok(())
    }
}
