//! # 未登録ルートのフォールバック
//!
//! どのルートにもマッチしないリクエスト（登録済みパスへの未対応メソッドを含む）に
//! 404 と [`NotFoundResponse`] を返す。

use axum::{Json, extract::OriginalUri, http::StatusCode};
use storefront_shared::NotFoundResponse;

/// 404 フォールバックハンドラ
///
/// `path` にはクエリ文字列を含むリクエストパスをそのまま入れる。
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> (StatusCode, Json<NotFoundResponse>) {
    let path = uri
        .path_and_query()
        .map(|path_and_query| path_and_query.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    (StatusCode::NOT_FOUND, Json(NotFoundResponse::new(path)))
}
