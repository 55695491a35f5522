//! # ヘルスチェック共通型
//!
//! 全サービスのヘルスチェックエンドポイント（`GET /health`）で
//! 使用される共通レスポンス型を提供する。

use serde::{Deserialize, Serialize};

/// 稼働中を示す固定ステータス値
pub const HEALTH_STATUS_OK: &str = "ok";

/// ヘルスチェックレスポンス
///
/// `status` は常に `"ok"`、`service` は設定上のサービス名、
/// `timestamp` はリクエスト受信時刻（ISO 8601）を示す。
///
/// ## 使用例
///
/// ```
/// use storefront_shared::HealthResponse;
///
/// let response = HealthResponse::ok("cart-service", "2024-01-01T00:00:00.000Z");
/// assert_eq!(response.status, "ok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// 稼働状態（常に `"ok"`）
    #[cfg_attr(feature = "openapi", schema(example = "ok"))]
    pub status:    String,
    /// サービス名
    #[cfg_attr(feature = "openapi", schema(example = "cart-service"))]
    pub service:   String,
    /// レスポンス生成時刻（ISO 8601）
    #[cfg_attr(
        feature = "openapi",
        schema(format = DateTime, example = "2024-01-01T00:00:00.000Z")
    )]
    pub timestamp: String,
}

impl HealthResponse {
    /// 稼働中のレスポンスを作成する
    pub fn ok(service: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            status:    HEALTH_STATUS_OK.to_string(),
            service:   service.into(),
            timestamp: timestamp.into(),
        }
    }
}
