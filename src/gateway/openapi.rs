//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::error::ErrorKind;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    AccountResponse, CreateAccountRequest, CreatePaymentRequest, CreatedResponse,
    CurrencyResponse, ErrorBody, PaymentResponse,
};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payment Ledger API",
        version = "1.0.0",
        description = "Multi-currency account ledger with atomic, concurrency-safe transfers.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::accounts::create_account,
        crate::gateway::handlers::accounts::list_accounts,
        crate::gateway::handlers::accounts::get_account,
        crate::gateway::handlers::accounts::list_account_payments,
        crate::gateway::handlers::payments::create_payment,
        crate::gateway::handlers::currencies::list_currencies,
    ),
    components(
        schemas(
            HealthResponse,
            CreateAccountRequest,
            CreatePaymentRequest,
            CreatedResponse,
            AccountResponse,
            PaymentResponse,
            CurrencyResponse,
            ErrorBody,
            ErrorKind,
        )
    ),
    tags(
        (name = "System", description = "Health"),
        (name = "Accounts", description = "Account creation and lookup"),
        (name = "Payments", description = "Transfers and payment history"),
        (name = "Currencies", description = "Currency reference data"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Payment Ledger API");
        assert_eq!(doc.info.version, "1.0.0");
    }

    #[test]
    fn test_openapi_json_serializable() {
        let doc = ApiDoc::openapi();
        let json_str = doc.to_json().unwrap();
        assert!(json_str.contains("Payment Ledger API"));
        assert!(json_str.contains("currencyCode"));
    }

    #[test]
    fn test_endpoints_registered() {
        let paths = ApiDoc::openapi().paths;
        for path in [
            "/health",
            "/accounts",
            "/accounts/{id}",
            "/accounts/{id}/payments",
            "/payments",
            "/currencies",
        ] {
            assert!(paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_error_body_schema_registered() {
        let components = ApiDoc::openapi().components.unwrap();
        assert!(components.schemas.contains_key("ErrorBody"));
        assert!(components.schemas.contains_key("ErrorKind"));
    }
}
