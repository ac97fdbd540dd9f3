pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use crate::service::Ledger;
use state::AppState;

/// Build the HTTP router over a ledger service
pub fn router(ledger: Arc<dyn Ledger>) -> Router {
    let state = Arc::new(AppState::new(ledger));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/accounts",
            post(handlers::create_account).get(handlers::list_accounts),
        )
        .route("/accounts/{id}", get(handlers::get_account))
        .route("/accounts/{id}/payments", get(handlers::list_account_payments))
        .route("/payments", post(handlers::create_payment))
        .route("/currencies", get(handlers::list_currencies))
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start HTTP Gateway server; returns after Ctrl-C once in-flight requests drain
pub async fn run_server(config: &GatewayConfig, ledger: Arc<dyn Ledger>) -> anyhow::Result<()> {
    let app = router(ledger);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
