use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiError, CurrencyResponse};

/// Known currencies ordered by numeric code
#[utoipa::path(
    get,
    path = "/currencies",
    responses(
        (status = 200, description = "Currencies", body = Vec<CurrencyResponse>)
    ),
    tag = "Currencies"
)]
pub async fn list_currencies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CurrencyResponse>>, ApiError> {
    let currencies = state.ledger.list_currencies().await?;
    Ok(Json(currencies.into_iter().map(Into::into).collect()))
}
