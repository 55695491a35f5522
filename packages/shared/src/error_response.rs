//! # エラーレスポンス
//!
//! 全サービスで共通のエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - 純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は各サービスの責務（shared に axum 依存を入れない）
//! - `stack` は開発環境でのみ設定される。`None` のときは JSON に出力しない

use serde::{Deserialize, Serialize};

/// ステータス未指定時のフォールバックメッセージ
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal Server Error";

/// 未登録ルートへのリクエストに返すメッセージ
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found";

/// エラーレスポンス
///
/// ハンドラで発生した失敗を表す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// エラーメッセージ
    #[cfg_attr(feature = "openapi", schema(example = "Internal Server Error"))]
    pub message: String,
    /// HTTP ステータスコード
    #[cfg_attr(feature = "openapi", schema(example = 500))]
    pub status:  u16,
    /// 診断情報（開発環境のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack:   Option<String>,
}

impl ErrorResponse {
    /// 診断情報なしのレスポンスを作成する
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
            stack: None,
        }
    }

    /// 診断情報を付与する
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// 404 Not Found レスポンス
///
/// どのルートにもマッチしなかったリクエストに返す。
/// `path` はリクエストされたパス（クエリ文字列を含む）をそのまま返す。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotFoundResponse {
    #[cfg_attr(feature = "openapi", schema(example = "Route not found"))]
    pub message: String,
    #[cfg_attr(feature = "openapi", schema(example = "/unknown"))]
    pub path:    String,
}

impl NotFoundResponse {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            message: ROUTE_NOT_FOUND_MESSAGE.to_string(),
            path:    path.into(),
        }
    }
}
