//! Response DTOs and the error body
//!
//! Balances render with exactly 2 fractional digits; payment amounts render
//! as submitted.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::account::Account;
use crate::currency::Currency;
use crate::error::{ErrorKind, LedgerError};
use crate::money;
use crate::payment::Payment;

/// Id of a newly created resource
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    #[schema(example = 980)]
    pub currency_code: u16,
    #[schema(example = "9049.44")]
    pub balance: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            currency_code: account.currency_code.get(),
            balance: money::format_balance(account.balance),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub from_account: String,
    pub to_account: String,
    #[schema(example = 980)]
    pub currency_code: u16,
    #[schema(example = "950.556")]
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            from_account: payment.from_account.to_string(),
            to_account: payment.to_account.to_string(),
            currency_code: payment.currency_code.get(),
            amount: payment.amount.to_string(),
            created_at: payment.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrencyResponse {
    #[schema(example = 980)]
    pub code: u16,
    #[schema(example = "UAH")]
    pub alpha: String,
    #[schema(example = "Ukrainian Hryvnia")]
    pub name: String,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            code: currency.code.get(),
            alpha: currency.alpha,
            name: currency.name,
        }
    }
}

/// Error body shared by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable message
    #[schema(example = "Insufficient funds")]
    pub error: String,
    pub kind: ErrorKind,
    #[schema(example = "INSUFFICIENT_FUNDS")]
    pub code: String,
}

/// Handler error: a [`LedgerError`] rendered as [`ErrorBody`]
#[derive(Debug)]
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind(),
            code: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{AccountId, CurrencyCode, PaymentId};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_account_response_fixed_scale() {
        let response = AccountResponse::from(Account {
            id: AccountId::new(),
            currency_code: CurrencyCode::new(643).unwrap(),
            balance: Decimal::from_str("10307").unwrap(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["balance"], "10307.00");
        assert_eq!(json["currencyCode"], 643);
    }

    #[test]
    fn test_payment_response_camel_case() {
        let response = PaymentResponse::from(Payment {
            id: PaymentId::new(),
            from_account: AccountId::new(),
            to_account: AccountId::new(),
            currency_code: CurrencyCode::new(980).unwrap(),
            amount: Decimal::from_str("950.556").unwrap(),
            created_at: Utc::now(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["amount"], "950.556");
        assert!(json.get("fromAccount").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_api_error_status_and_body() {
        let response = ApiError(LedgerError::InsufficientFunds).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError(LedgerError::ConcurrencyConflict).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = ErrorBody {
            error: "x".into(),
            kind: ErrorKind::NotFound,
            code: "ACCOUNT_NOT_FOUND".into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "not_found");
    }
}
