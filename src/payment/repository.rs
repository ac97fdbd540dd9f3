//! Payment store: trait and PostgreSQL repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::models::{NewPayment, Payment};
use crate::core_types::{AccountId, CurrencyCode, PaymentId};
use crate::store::StoreError;
use crate::store::postgres::PgUnitOfWork;

/// Append-only payment log
#[async_trait]
pub trait PaymentStore<Tx: Send + 'static>: Send + Sync {
    /// Record a payment inside the same unit of work as its balance updates
    async fn insert(&self, tx: &mut Tx, payment: NewPayment) -> Result<PaymentId, StoreError>;

    /// Committed payments originating from `account_id`, oldest first.
    /// Unknown accounts yield an empty list.
    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Payment>, StoreError>;
}

/// PostgreSQL payment repository over `payments_tb`
#[derive(Clone)]
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_payment(row: &PgRow) -> Result<Payment, sqlx::Error> {
    let code: i32 = row.try_get("currency_code")?;
    let currency_code = CurrencyCode::try_from(code).map_err(|e| sqlx::Error::ColumnDecode {
        index: "currency_code".to_string(),
        source: e.into(),
    })?;
    Ok(Payment {
        id: row.try_get("payment_id")?,
        from_account: row.try_get("from_account")?,
        to_account: row.try_get("to_account")?,
        currency_code,
        amount: row.try_get::<Decimal, _>("amount")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl PaymentStore<PgUnitOfWork> for PgPaymentStore {
    async fn insert(
        &self,
        tx: &mut PgUnitOfWork,
        payment: NewPayment,
    ) -> Result<PaymentId, StoreError> {
        let id = PaymentId::new();

        sqlx::query(
            r#"INSERT INTO payments_tb
                   (payment_id, from_account, to_account, currency_code, amount)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(id)
        .bind(payment.from_account)
        .bind(payment.to_account)
        .bind(payment.currency_code.as_i32())
        .bind(payment.amount)
        .execute(tx.conn())
        .await?;

        Ok(id)
    }

    async fn list_by_account(&self, account_id: AccountId) -> Result<Vec<Payment>, StoreError> {
        let rows = sqlx::query(
            r#"SELECT payment_id, from_account, to_account, currency_code, amount, created_at
               FROM payments_tb
               WHERE from_account = $1
               ORDER BY created_at ASC, seq ASC"#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| row_to_payment(r).map_err(StoreError::from))
            .collect()
    }
}
