//! # 未登録ルートのテスト
//!
//! どのルートにもマッチしないリクエストが 404 と JSON を返すことを検証する。

mod common;

use axum::{Router, routing::get};
use common::{body_json, send, test_app};
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use storefront_services::config::Environment;

#[rstest]
#[case::未登録パス(Method::GET, "/unknown")]
#[case::クエリ付き(Method::GET, "/nope?x=1")]
#[case::共通エンドポイントへの未対応メソッド(Method::POST, "/health")]
#[case::docsへの未対応メソッド(Method::DELETE, "/docs")]
#[case::サービス固有ルートへの未対応メソッド(Method::PUT, "/api/v1/carts")]
#[tokio::test]
async fn test_未登録のルートは404とパスを返す(#[case] method: Method, #[case] uri: &str) {
    let routes = Router::new().route("/api/v1/carts", get(|| async { "[]" }));
    let app = test_app(Environment::Production, routes);

    let response = send(app, method, uri).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Route not found", "path": uri })
    );
}

#[tokio::test]
async fn test_404にもセキュリティヘッダーが付与される() {
    let app = test_app(Environment::Development, Router::new());

    let response = send(app, Method::GET, "/missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
}
