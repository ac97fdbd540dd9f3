//! Payment handlers

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiJson, CreatePaymentRequest, CreatedResponse, ErrorBody};

/// Transfer funds between two accounts
///
/// The amount is converted independently into each account's currency and
/// rounded half-up to 2 digits. The source balance must stay strictly positive.
#[utoipa::path(
    post,
    path = "/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Transfer committed", body = CreatedResponse),
        (status = 400, description = "Invalid request, missing rate or insufficient funds", body = ErrorBody),
        (status = 404, description = "Unknown account", body = ErrorBody),
        (status = 409, description = "Concurrent update, retry", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Payments"
)]
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let transfer = req.into_transfer()?;
    let id = state.ledger.create_payment(transfer).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_string() }),
    ))
}
