//! # ミドルウェア
//!
//! 全サービス共通のリクエスト前後処理を提供する。

mod access_log;
mod security_headers;

pub use access_log::{AccessLogLayer, AccessLogService};
pub use security_headers::{SECURITY_HEADERS, security_headers};
