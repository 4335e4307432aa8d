//! Black-box tests for the HTTP API.
//!
//! Each test spawns the real router on an ephemeral port with its own
//! throwaway database, then drives it over HTTP like any client would.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use soko_api::{routes, AppState};
use soko_db::{Database, DbConfig};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

impl TestServer {
    async fn spawn() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let db = Database::new(DbConfig::new(dir.path().join("api-test.db")))
            .await
            .expect("failed to open database");

        let app = routes::router(Arc::new(AppState { db }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            handle,
            _dir: dir,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_product(
    client: &reqwest::Client,
    base_url: &str,
    price_cents: i64,
    quantity: i64,
) -> Value {
    let res = client
        .post(format!("{}/products", base_url))
        .json(&json!({
            "name": "Shirt",
            "description": "Plain cotton shirt",
            "price_cents": price_cents,
            "quantity": quantity,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn product_crud_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 5).await;
    assert_eq!(product["name"], "Shirt");
    assert_eq!(product["price_cents"], 2000);
    assert_eq!(product["quantity"], 5);
    assert_eq!(product["status"], "available");
    let id = product["id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing: Value = res.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Full overwrite; draining the stock flips the status to sold.
    let res = client
        .put(format!("{}/products/{}", srv.base_url, id))
        .json(&json!({
            "name": "Shirt (clearance)",
            "price_cents": 1500,
            "quantity": 0,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["name"], "Shirt (clearance)");
    assert_eq!(updated["status"], "sold");

    let res = client
        .delete(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["deleted"], true);

    let res = client
        .get(format!("{}/products/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_product_rejects_invalid_input() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/products", srv.base_url))
        .json(&json!({
            "name": "Freebie",
            "price_cents": 0,
            "quantity": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn order_flow_reserves_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 1).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({"product_id": product_id, "quantity": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["total_cents"], 2000);
    let order_id = order["id"].as_str().unwrap().to_string();

    // The product sold out with that order.
    let res = client
        .get(format!("{}/products/{}", srv.base_url, product_id))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 0);
    assert_eq!(body["status"], "sold");

    // Second order against the drained product is rejected.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({"product_id": product_id, "quantity": 1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "PRODUCT_SOLD");

    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    let listing: Value = res.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/orders/no-such-order", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_exceeding_stock_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 1).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({"product_id": product_id, "quantity": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    // Stock untouched, no order created.
    let res = client
        .get(format!("{}/products/{}", srv.base_url, product_id))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["quantity"], 1);

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .send()
        .await
        .unwrap();
    let listing: Value = res.json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn payment_verification_flow() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 1).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({"product_id": product_id, "quantity": 1}))
        .send()
        .await
        .unwrap();
    let order: Value = res.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();

    // One cent short: rejected, recorded as failed.
    let res = client
        .post(format!("{}/payments/verify", srv.base_url))
        .json(&json!({"order_id": order_id, "amount_cents": 1999, "method": "mpesa"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "AMOUNT_MISMATCH");

    // Unknown payment channel.
    let res = client
        .post(format!("{}/payments/verify", srv.base_url))
        .json(&json!({"order_id": order_id, "amount_cents": 2000, "method": "cash"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Exact amount: completed.
    let res = client
        .post(format!("{}/payments/verify", srv.base_url))
        .json(&json!({"order_id": order_id, "amount_cents": 2000, "method": "mpesa"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let payment: Value = res.json().await.unwrap();
    assert_eq!(payment["status"], "completed");
    assert_eq!(payment["amount_cents"], 2000);
    assert_eq!(payment["method"], "mpesa");

    // The order cannot be paid twice.
    let res = client
        .post(format!("{}/payments/verify", srv.base_url))
        .json(&json!({"order_id": order_id, "amount_cents": 2000, "method": "stripe"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "ALREADY_PAID");

    // Unknown order.
    let res = client
        .post(format!("{}/payments/verify", srv.base_url))
        .json(&json!({"order_id": "no-such-order", "amount_cents": 2000, "method": "mpesa"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mark_sold_then_conflict_on_repeat() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 5).await;
    let id = product["id"].as_str().unwrap().to_string();

    let res = client
        .patch(format!("{}/products/{}/mark-sold", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "sold");

    let res = client
        .patch(format!("{}/products/{}/mark-sold", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "ALREADY_SOLD");
}

#[tokio::test]
async fn deleting_a_product_cascades_through_the_api() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let product = create_product(&client, &srv.base_url, 2000, 2).await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .json(&json!({"product_id": product_id, "quantity": 1}))
        .send()
        .await
        .unwrap();
    let order: Value = res.json().await.unwrap();
    let order_id = order["id"].as_str().unwrap().to_string();

    let res = client
        .delete(format!("{}/products/{}", srv.base_url, product_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The order went with its product.
    let res = client
        .get(format!("{}/orders/{}", srv.base_url, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
