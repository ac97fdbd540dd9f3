//! Request DTOs
//!
//! Decimal fields arrive as JSON strings and are parsed with
//! [`crate::money`], never through floats.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::core_types::{AccountId, CurrencyCode};
use crate::error::LedgerError;
use crate::money;
use crate::store::Page;
use crate::transfer::TransferRequest;

/// POST /accounts body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// ISO 4217 numeric code
    #[schema(example = 980)]
    pub currency_code: u16,
    /// Opening balance, rounded half-up to 2 digits; must stay > 0
    #[schema(example = "10000")]
    pub balance: String,
}

impl CreateAccountRequest {
    pub fn parse(&self) -> Result<(CurrencyCode, rust_decimal::Decimal), LedgerError> {
        let code = parse_currency(self.currency_code)?;
        let balance = money::parse_balance(&self.balance)?;
        Ok((code, balance))
    }
}

/// POST /payments body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[schema(value_type = String, format = Uuid)]
    pub from_account: AccountId,
    #[schema(value_type = String, format = Uuid)]
    pub to_account: AccountId,
    /// Currency the amount is denominated in
    #[schema(example = 933)]
    pub currency_code: u16,
    #[schema(example = "950.556")]
    pub amount: String,
}

impl CreatePaymentRequest {
    pub fn into_transfer(self) -> Result<TransferRequest, LedgerError> {
        Ok(TransferRequest::new(
            self.from_account,
            self.to_account,
            parse_currency(self.currency_code)?,
            money::parse_amount(&self.amount)?,
        ))
    }
}

/// Offset/limit query for account listing
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Rows to skip (default 0)
    pub offset: Option<u32>,
    /// Max rows (default 50, capped at 1000)
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::new(
            self.offset.unwrap_or(0),
            self.limit.unwrap_or(Page::DEFAULT_LIMIT),
        )
    }
}

fn parse_currency(code: u16) -> Result<CurrencyCode, LedgerError> {
    CurrencyCode::try_from(code).map_err(LedgerError::Validation)
}
