//! # アプリケーション構築
//!
//! 共通エンドポイント・サービス固有ルート・ミドルウェアを 1 つのルーターにまとめる。
//! ソケットやシグナルには触れないため、テストでは `oneshot` でそのまま叩ける。

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use storefront_shared::{
    Clock,
    observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServiceConfig,
    error::{ErrorFormatter, failure_for_panic, format_failures},
    handler::{HealthState, docs_router, health_check, route_not_found},
    middleware::{AccessLogLayer, security_headers},
    openapi::ApiDocs,
};

/// リクエストボディの上限（JSON / URL エンコード共通）
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// ルーターを組み立てる
///
/// `routes` はサービス固有のルート。共通エンドポイント（`/health`, `/docs`, `/docs.json`）
/// と同じミドルウェアの内側に配置される。
pub fn build_app(
    config: &ServiceConfig,
    docs: &ApiDocs,
    clock: Arc<dyn Clock>,
    routes: Router,
) -> Router {
    let health_state = Arc::new(HealthState {
        service_name: config.service_name.clone(),
        clock,
    });
    let formatter = ErrorFormatter::new(config.environment.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(health_state)
        .merge(docs_router(docs.clone()))
        .merge(routes)
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        // レイヤー順序（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: X-Request-Id を採番（クライアント提供値があれば優先）
        // 2. TraceLayer: request_id 付きのリクエストスパン
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        // 4. AccessLogLayer: 受付時点のアクセスログ（スパン内）
        // 5. security_headers: セキュリティヘッダー
        // 6. CorsLayer: 全オリジン許可
        // 7. DefaultBodyLimit: ボディ上限
        // 8. format_failures: Failure をログ出力して JSON 化
        // 9. CatchPanicLayer（最内）: ハンドラの panic を Failure に変換
        .layer(CatchPanicLayer::custom(failure_for_panic))
        .layer(from_fn_with_state(formatter, format_failures))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(from_fn(security_headers))
        .layer(AccessLogLayer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
