//! # Delivery Service
//!
//! 配送サービスのエントリーポイント。
//! `SERVICE_NAME` 未設定時は `delivery-service` を名乗る。

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_services::launch("delivery-service").await
}
