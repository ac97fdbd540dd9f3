//! Account store: trait and PostgreSQL repository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

use super::models::{Account, NewAccount};
use crate::core_types::{AccountId, CurrencyCode};
use crate::store::postgres::PgUnitOfWork;
use crate::store::{Page, StoreError};

/// Account table capability set.
///
/// `Tx` is the storage engine's unit of work. Locked reads and updates only
/// exist inside one; creation and plain reads run against committed state.
#[async_trait]
pub trait AccountStore<Tx: Send + 'static>: Send + Sync {
    /// Insert a new account. Fails with `InvalidBalance` unless `0 < balance <= MAX_BALANCE`.
    async fn create(&self, account: NewAccount) -> Result<AccountId, StoreError>;

    /// Unlocked read of committed state
    async fn get(&self, id: AccountId) -> Result<Account, StoreError>;

    /// Read and exclusively lock the row for the rest of the unit of work.
    ///
    /// Blocks while another unit of work holds the row. The lock is released
    /// only by commit or rollback of `tx`.
    async fn get_locked(&self, tx: &mut Tx, id: AccountId) -> Result<Account, StoreError>;

    /// Write a new balance for a row locked by `tx`.
    /// Fails with `InvalidBalance` unless `0 < balance <= MAX_BALANCE`.
    async fn update(&self, tx: &mut Tx, account: &Account) -> Result<(), StoreError>;

    /// Accounts ordered by id ascending
    async fn list(&self, page: Page) -> Result<Vec<Account>, StoreError>;
}

/// PostgreSQL account repository over `accounts_tb`
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, sqlx::Error> {
    let code: i32 = row.try_get("currency_code")?;
    let currency_code = CurrencyCode::try_from(code).map_err(|e| sqlx::Error::ColumnDecode {
        index: "currency_code".to_string(),
        source: e.into(),
    })?;
    Ok(Account {
        id: row.try_get("account_id")?,
        currency_code,
        balance: row.try_get::<Decimal, _>("balance")?,
    })
}

#[async_trait]
impl AccountStore<PgUnitOfWork> for PgAccountStore {
    async fn create(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let account = account.into_account(AccountId::new())?;

        sqlx::query(
            r#"INSERT INTO accounts_tb (account_id, currency_code, balance)
               VALUES ($1, $2, $3)"#,
        )
        .bind(account.id)
        .bind(account.currency_code.as_i32())
        .bind(account.balance)
        .execute(&self.pool)
        .await?;

        Ok(account.id)
    }

    async fn get(&self, id: AccountId) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"SELECT account_id, currency_code, balance
               FROM accounts_tb WHERE account_id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::AccountNotFound(id))?;

        Ok(row_to_account(&row)?)
    }

    async fn get_locked(
        &self,
        tx: &mut PgUnitOfWork,
        id: AccountId,
    ) -> Result<Account, StoreError> {
        let row = sqlx::query(
            r#"SELECT account_id, currency_code, balance
               FROM accounts_tb WHERE account_id = $1
               FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(tx.conn())
        .await?
        .ok_or(StoreError::AccountNotFound(id))?;

        debug!(account_id = %id, "Row lock acquired");
        Ok(row_to_account(&row)?)
    }

    async fn update(&self, tx: &mut PgUnitOfWork, account: &Account) -> Result<(), StoreError> {
        Account::check_balance(account.balance)?;

        let result = sqlx::query(r#"UPDATE accounts_tb SET balance = $1 WHERE account_id = $2"#)
            .bind(account.balance)
            .bind(account.id)
            .execute(tx.conn())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::AccountNotFound(account.id));
        }
        Ok(())
    }

    async fn list(&self, page: Page) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT account_id, currency_code, balance
               FROM accounts_tb
               ORDER BY account_id ASC
               OFFSET $1 LIMIT $2"#,
        )
        .bind(i64::from(page.offset))
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| row_to_account(r).map_err(StoreError::from))
            .collect()
    }
}
