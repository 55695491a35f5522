//! # セキュリティヘッダーミドルウェア
//!
//! 全レスポンスにブラウザ向けのセキュリティヘッダーを付与する。
//! ハンドラやルーターが既に設定したヘッダーは上書きしない
//! （`/docs` は独自の Content-Security-Policy を持つ）。

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// 付与するヘッダーと既定値
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

/// レスポンスにセキュリティヘッダーを付与する
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers
            .entry(HeaderName::from_static(name))
            .or_insert_with(|| HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{StatusCode, header},
        middleware::from_fn,
        routing::get,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/plain", get(|| async { "ok" }))
            .route(
                "/custom",
                get(|| async { ([(header::X_FRAME_OPTIONS, "DENY")], "ok") }),
            )
            .layer(from_fn(security_headers))
    }

    async fn get_response(uri: &str) -> Response {
        app()
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_全セキュリティヘッダーが付与される() {
        let response = get_response("/plain").await;

        assert_eq!(response.status(), StatusCode::OK);
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(
                response.headers().get(name).and_then(|v| v.to_str().ok()),
                Some(value),
                "{name} が付与されること"
            );
        }
    }

    #[tokio::test]
    async fn test_ハンドラが設定したヘッダーは上書きしない() {
        let response = get_response("/custom").await;

        assert_eq!(response.headers().get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(
            response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
    }
}
