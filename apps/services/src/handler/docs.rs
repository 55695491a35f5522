//! # API ドキュメントの配信
//!
//! - `GET /docs`: Swagger UI（CDN から読み込む静的 HTML）
//! - `GET /docs.json`: 起動時に生成した OpenAPI ドキュメント
//!
//! どちらも起動時に組み立てた内容を返すだけで、リクエストごとに再生成しない。

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::openapi::ApiDocs;

/// Swagger UI ページ用の Content-Security-Policy
///
/// 全体に付与する既定の CSP では CDN のスクリプトが読み込めないため、
/// このページだけ unpkg.com とインラインスクリプトを許可する。
pub const DOCS_CONTENT_SECURITY_POLICY: &str = "default-src 'self';\
     script-src 'self' 'unsafe-inline' https://unpkg.com;\
     style-src 'self' 'unsafe-inline' https://unpkg.com;\
     img-src 'self' data: https:;\
     connect-src 'self';\
     object-src 'none';\
     frame-ancestors 'self'";

/// `/docs` と `/docs.json` のルーター
pub fn docs_router(docs: ApiDocs) -> Router {
    Router::new()
        .route("/docs", get(docs_page))
        .route("/docs.json", get(docs_json))
        .with_state(docs)
}

async fn docs_page(State(docs): State<ApiDocs>) -> Response {
    (
        [(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(DOCS_CONTENT_SECURITY_POLICY),
        )],
        Html(docs.viewer_html().to_string()),
    )
        .into_response()
}

async fn docs_json(State(docs): State<ApiDocs>) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        docs.json().to_string(),
    )
        .into_response()
}
