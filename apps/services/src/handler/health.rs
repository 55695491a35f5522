//! # ヘルスチェックハンドラ
//!
//! ロードバランサーやオーケストレーターからの死活監視に使う。
//! 依存サービスには問い合わせず、プロセスが応答できることだけを返す。
//!
//! レスポンス型は [`storefront_shared::HealthResponse`] を参照。

use std::sync::Arc;

use axum::{Json, extract::State};
use storefront_shared::{Clock, HealthResponse};

/// ヘルスチェック用の State
pub struct HealthState {
    pub service_name: String,
    pub clock:        Arc<dyn Clock>,
}

/// ヘルスチェックエンドポイント
///
/// 常に 200 OK を返す。`timestamp` は処理時点の UTC 時刻。
#[utoipa::path(
   get,
   path = "/health",
   tag = "Health",
   responses(
      (status = 200, description = "サービス稼働中", body = HealthResponse)
   )
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(
        state.service_name.clone(),
        state.clock.now_iso8601(),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use storefront_shared::FixedClock;
    use tower::ServiceExt;

    use super::*;

    fn app(service_name: &str) -> Router {
        let state = Arc::new(HealthState {
            service_name: service_name.to_string(),
            clock:        Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap(),
            )),
        });
        Router::new()
            .route("/health", get(health_check))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_ヘルスチェックはokとサービス名と時刻を返す() {
        let response = app("product-service")
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            HealthResponse::ok("product-service", "2026-01-15T09:30:00.000Z")
        );
    }
}
