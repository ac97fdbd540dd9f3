//! Account handlers

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use super::super::state::AppState;
use super::super::types::{
    AccountResponse, ApiError, ApiJson, ApiPath, ApiQuery, CreateAccountRequest, CreatedResponse,
    ErrorBody, PageQuery, PaymentResponse,
};
use crate::core_types::AccountId;

/// Create an account
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = CreatedResponse),
        (status = 400, description = "Invalid currency or non-positive balance", body = ErrorBody)
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let (currency_code, balance) = req.parse()?;
    let id = state.ledger.create_account(currency_code, balance).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}

/// Get one account
#[utoipa::path(
    get,
    path = "/accounts/{id}",
    params(("id" = String, Path, description = "Account id (UUID)")),
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "Unknown account", body = ErrorBody)
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.ledger.get_account(id).await?;
    Ok(Json(account.into()))
}

/// List accounts ordered by id
#[utoipa::path(
    get,
    path = "/accounts",
    params(PageQuery),
    responses(
        (status = 200, description = "Accounts", body = Vec<AccountResponse>)
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.ledger.list_accounts(query.page()).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Payments originating from an account, oldest first
#[utoipa::path(
    get,
    path = "/accounts/{id}/payments",
    params(("id" = String, Path, description = "Account id (UUID)")),
    responses(
        (status = 200, description = "Payments, empty when none", body = Vec<PaymentResponse>),
        (status = 400, description = "Malformed id", body = ErrorBody)
    ),
    tag = "Payments"
)]
pub async fn list_account_payments(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<AccountId>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let payments = state.ledger.list_payments(id).await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}
