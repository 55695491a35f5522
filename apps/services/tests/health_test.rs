//! # ヘルスチェックのテスト
//!
//! 共通ミドルウェアを通した `/health` の応答を検証する。

mod common;

use axum::Router;
use common::{body_json, send, test_app};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use storefront_services::config::Environment;

#[tokio::test]
async fn test_ヘルスチェックは200とサービス情報を返す() {
    let app = test_app(Environment::Development, Router::new());

    let response = send(app, Method::GET, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({
            "status": "ok",
            "service": "cart-service",
            "timestamp": "2026-03-01T12:00:00.000Z"
        })
    );
}

#[tokio::test]
async fn test_ヘルスチェックは本番環境でも同じ形式で返す() {
    let app = test_app(Environment::Production, Router::new());

    let response = send(app, Method::GET, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "cart-service");
}

#[tokio::test]
async fn test_ヘルスチェックにもセキュリティヘッダーとrequest_idが付与される() {
    let app = test_app(Environment::Development, Router::new());

    let response = send(app, Method::GET, "/health").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("x-request-id"));
}
