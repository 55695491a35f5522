//! # Product Service
//!
//! 商品サービスのエントリーポイント。
//! `SERVICE_NAME` 未設定時は `product-service` を名乗る。

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    storefront_services::launch("product-service").await
}
