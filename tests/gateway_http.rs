//! HTTP round trips through the router on an ephemeral port

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;

use payment_ledger::config::AppConfig;
use payment_ledger::gateway;
use payment_ledger::{Ledger, LedgerService, MemoryStorage, StaticRateSource};

/// Spawn the gateway over a fresh in-memory ledger and return its base URL
async fn spawn_gateway() -> String {
    let config = AppConfig::load("dev").unwrap();
    let rates = StaticRateSource::new(config.currency.currencies, config.currency.rates);
    let ledger: Arc<dyn Ledger> = Arc::new(LedgerService::new(
        Arc::new(MemoryStorage::new(Duration::from_secs(5))),
        Arc::new(rates),
        config.currency.base_currency,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, gateway::router(ledger)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn create_account(client: &reqwest::Client, base: &str, currency: u16, balance: &str) -> String {
    let resp = client
        .post(format!("{}/accounts", base))
        .json(&json!({ "currencyCode": currency, "balance": balance }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

async fn get_json(client: &reqwest::Client, url: String) -> (u16, Value) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn test_health() {
    let base = spawn_gateway().await;
    let (status, body) = get_json(&reqwest::Client::new(), format!("{}/health", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_cross_currency_payment_round_trip() {
    let base = spawn_gateway().await;
    let client = reqwest::Client::new();

    let x = create_account(&client, &base, 980, "10000").await;
    let y = create_account(&client, &base, 643, "10000").await;

    let resp = client
        .post(format!("{}/payments", base))
        .json(&json!({
            "fromAccount": x,
            "toAccount": y,
            "currencyCode": 933,
            "amount": "10"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let payment: Value = resp.json().await.unwrap();
    let payment_id = payment["id"].as_str().unwrap().to_string();

    let (status, account) = get_json(&client, format!("{}/accounts/{}", base, x)).await;
    assert_eq!(status, 200);
    assert_eq!(account["balance"], "9874.01");
    assert_eq!(account["currencyCode"], 980);

    let (_, account) = get_json(&client, format!("{}/accounts/{}", base, y)).await;
    assert_eq!(account["balance"], "10307.00");

    let (status, payments) = get_json(&client, format!("{}/accounts/{}/payments", base, x)).await;
    assert_eq!(status, 200);
    let payments = payments.as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["id"], payment_id.as_str());
    assert_eq!(payments[0]["toAccount"], y.as_str());
    assert_eq!(payments[0]["currencyCode"], 933);
    assert_eq!(payments[0]["amount"], "10");
}

#[tokio::test]
async fn test_error_bodies() {
    let base = spawn_gateway().await;
    let client = reqwest::Client::new();
    let x = create_account(&client, &base, 980, "100").await;
    let y = create_account(&client, &base, 980, "100").await;

    // Insufficient funds -> 400 validation
    let resp = client
        .post(format!("{}/payments", base))
        .json(&json!({ "fromAccount": x, "toAccount": y, "currencyCode": 980, "amount": "100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");
    assert!(body["error"].is_string());

    // Unknown account -> 404
    let missing = uuid::Uuid::new_v4();
    let (status, body) = get_json(&client, format!("{}/accounts/{}", base, missing)).await;
    assert_eq!(status, 404);
    assert_eq!(body["kind"], "not_found");
    assert_eq!(body["code"], "ACCOUNT_NOT_FOUND");

    // Malformed id -> 400
    let (status, body) = get_json(&client, format!("{}/accounts/not-a-uuid", base)).await;
    assert_eq!(status, 400);
    assert_eq!(body["kind"], "validation");

    // Non-positive opening balance -> 400
    let resp = client
        .post(format!("{}/accounts", base))
        .json(&json!({ "currencyCode": 980, "balance": "0" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Above the largest storable balance -> 400 on every backend
    let resp = client
        .post(format!("{}/accounts", base))
        .json(&json!({ "currencyCode": 980, "balance": "1000000000000000000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Malformed amount -> 400
    let resp = client
        .post(format!("{}/payments", base))
        .json(&json!({ "fromAccount": x, "toAccount": y, "currencyCode": 980, "amount": ".5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_endpoints() {
    let base = spawn_gateway().await;
    let client = reqwest::Client::new();
    for _ in 0..3 {
        create_account(&client, &base, 980, "1").await;
    }

    let (status, accounts) = get_json(&client, format!("{}/accounts?limit=2", base)).await;
    assert_eq!(status, 200);
    assert_eq!(accounts.as_array().unwrap().len(), 2);

    let (_, rest) = get_json(&client, format!("{}/accounts?offset=2", base)).await;
    assert_eq!(rest.as_array().unwrap().len(), 1);

    let unknown = uuid::Uuid::new_v4();
    let (status, payments) =
        get_json(&client, format!("{}/accounts/{}/payments", base, unknown)).await;
    assert_eq!(status, 200);
    assert!(payments.as_array().unwrap().is_empty());

    let (status, currencies) = get_json(&client, format!("{}/currencies", base)).await;
    assert_eq!(status, 200);
    let codes: Vec<u64> = currencies
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["code"].as_u64().unwrap())
        .collect();
    assert_eq!(codes, vec![643, 840, 933, 978, 980]);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let base = spawn_gateway().await;
    let (status, doc) =
        get_json(&reqwest::Client::new(), format!("{}/api-docs/openapi.json", base)).await;
    assert_eq!(status, 200);
    assert!(doc["paths"]["/payments"].is_object());
}
