//! # Order Service
//!
//! 注文サービスのエントリーポイント。
//! `SERVICE_NAME` 未設定時は `order-service` を名乗る。

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_services::launch("order-service").await
}
