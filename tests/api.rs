mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Register and log in a fresh account, returning a bearer token.
async fn login(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/token",
            json!({ "username": "alice", "password": "password123" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let app = ipms_api::app(common::test_state().await);
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_endpoints_require_a_token() {
    let app = ipms_api::app(common::test_state().await);
    let response = app
        .clone()
        .oneshot(get("/api/inventory/items", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get("/api/inventory/items", Some("not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn stock_out_over_the_ledger_returns_400() {
    let app = ipms_api::app(common::test_state().await);
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/inventory/items",
            json!({ "name": "Widget", "sku": "W-001", "quantity": 50, "reorder_level": 10 }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let item = body_json(response).await;
    let id = item["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/inventory/items/{id}/stock-out"),
            json!({ "amount": 45 }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["quantity"], 5);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/inventory/items/{id}/stock-out"),
            json!({ "amount": 10 }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Not enough stock"));

    // The failed stock-out left the quantity alone, and the item now counts
    // as low stock.
    let response = app
        .clone()
        .oneshot(get("/api/inventory/metrics", Some(&token)))
        .await
        .unwrap();
    let metrics = body_json(response).await;
    assert_eq!(metrics["total_items"], 1);
    assert_eq!(metrics["low_stock"], 1);
}

#[tokio::test]
async fn invalid_order_action_is_a_400_and_leaves_status_alone() {
    let app = ipms_api::app(common::test_state().await);
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/orders",
            json!({ "supplier": "Acme", "item": "Widget", "quantity": 3 }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/orders/{id}/action"),
            json!({ "action": "ship" }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/orders/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["status"], "PENDING");
}

#[tokio::test]
async fn user_management_is_admin_only() {
    let app = ipms_api::app(common::test_state().await);
    // Registration defaults to the STAFF role.
    let token = login(&app).await;

    let response = app
        .oneshot(get("/api/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn payment_webhook_is_unauthenticated_but_checks_the_reference() {
    let app = ipms_api::app(common::test_state().await);
    let response = app
        .oneshot(post_json(
            "/api/payments/webhook",
            json!({ "reference_id": "IPMS-DEADBEEF", "status": "FAILED" }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn csv_export_is_an_attachment() {
    let app = ipms_api::app(common::test_state().await);
    let token = login(&app).await;

    let response = app
        .oneshot(get("/api/inventory/items/export/csv", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("inventory.csv"));
}
