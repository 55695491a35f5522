//! # Cart Service
//!
//! カートサービスのエントリーポイント。
//! `SERVICE_NAME` 未設定時は `cart-service` を名乗る。

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_services::launch("cart-service").await
}
