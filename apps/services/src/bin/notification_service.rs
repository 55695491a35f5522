//! # Notification Service
//!
//! 通知サービスのエントリーポイント。
//! `SERVICE_NAME` 未設定時は `notification-service` を名乗る。

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_services::launch("notification-service").await
}
