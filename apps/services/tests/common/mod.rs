//! 統合テスト共通のヘルパー

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use axum::{Router, body::Body, response::Response};
use chrono::{TimeZone, Utc};
use http::{Method, Request};
use storefront_services::{
    app_builder::build_app,
    config::{Environment, ServiceConfig},
    openapi::ApiDocs,
};
use storefront_shared::FixedClock;
use tower::ServiceExt;

/// テスト用の固定時刻（`2026-03-01T12:00:00.000Z`）
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ))
}

pub fn test_config(environment: Environment) -> ServiceConfig {
    ServiceConfig {
        host: "127.0.0.1".to_string(),
        port: 4001,
        service_name: "cart-service".to_string(),
        environment,
    }
}

/// 共通ミドルウェア込みのルーターを構築する
pub fn test_app(environment: Environment, routes: Router) -> Router {
    let config = test_config(environment);
    let docs = ApiDocs::build(&config).unwrap();
    build_app(&config, &docs, fixed_clock(), routes)
}

pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// テストごとに一意な一時ディレクトリのパス（作成はしない）
pub fn temp_docs_dir() -> PathBuf {
    std::env::temp_dir().join(format!("storefront-docs-{}", uuid::Uuid::new_v4()))
}
