//! # HTTP リクエストハンドラ
//!
//! 全サービス共通のエンドポイントを定義する。
//!
//! ```text
//! handler.rs            # 親モジュール（re-export）
//! └── handler/
//!     ├── docs.rs       # API ドキュメント（/docs, /docs.json）
//!     ├── health.rs     # ヘルスチェック（/health）
//!     └── not_found.rs  # 未登録ルートのフォールバック
//! ```

pub mod docs;
pub mod health;
pub mod not_found;

pub use docs::docs_router;
pub use health::{HealthState, health_check};
pub use not_found::route_not_found;
