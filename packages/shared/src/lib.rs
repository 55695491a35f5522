//! # Storefront 共有ユーティリティ
//!
//! 全マイクロサービス（cart / delivery / notification / order / product）で
//! 使用される共通型とユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（HTTP レスポンスへの変換は各サービスの責務）
//! - OpenAPI スキーマとトレーシング初期化は feature で切り替える

pub mod clock;
pub mod error_response;
pub mod health;
pub mod observability;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error_response::{ErrorResponse, NotFoundResponse};
pub use health::HealthResponse;
