//! # Storefront サービス基盤
//!
//! cart / delivery / notification / order / product の各マイクロサービスが共有する
//! HTTP サーバーの起動キット。
//!
//! ## 提供する機能
//!
//! - `GET /health`: ヘルスチェック
//! - `GET /docs`, `GET /docs.json`: OpenAPI ドキュメント（起動時に `docs/swagger.json` へも書き出す）
//! - 失敗の JSON 整形（開発環境のみ診断情報を含める）と未登録ルートの 404
//! - セキュリティヘッダー・CORS・ボディ上限・Request ID・アクセスログ
//! - SIGTERM / SIGINT による graceful shutdown（猶予 10 秒で強制終了）
//!
//! ## モジュール構成
//!
//! - [`config`]: 環境変数からの設定読み込み
//! - [`error`]: 失敗の表現と HTTP レスポンスへの変換
//! - [`extract`]: 失敗を [`error::Failure`] として返すボディ抽出
//! - [`handler`]: 共通エンドポイント
//! - [`middleware`]: 共通ミドルウェア
//! - [`openapi`]: OpenAPI ドキュメントの生成と書き出し
//! - [`app_builder`]: ルーターの組み立て
//! - [`lifecycle`]: 起動から終了までの状態管理
//! - [`server`]: 起動手順とエントリーポイント
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use std::process::ExitCode;
//!
//! #[tokio::main]
//! async fn main() -> ExitCode {
//!     storefront_services::launch("cart-service").await
//! }
//! ```

pub mod app_builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod handler;
pub mod lifecycle;
pub mod middleware;
pub mod openapi;
pub mod server;

#[cfg(test)]
mod test_utils;

pub use error::{Failure, HandlerResult};
pub use extract::{FormBody, JsonBody};
pub use server::{BootstrapError, RunningService, ServiceBootstrap, launch, run};
