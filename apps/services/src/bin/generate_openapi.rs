//! # OpenAPI JSON 生成ツール
//!
//! サーバーを起動せずに OpenAPI ドキュメントを JSON 形式で標準出力に出力する。
//! 内容は起動時に `docs/swagger.json` へ書き出すものと同じ。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p storefront-services -- order-service > docs/swagger.json
//! ```
//!
//! 引数のサービス名は `SERVICE_NAME` 未設定時に使う。`PORT` は環境変数から読む。

use storefront_services::{config::ServiceConfig, openapi::ApiDocs};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let default_service_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "storefront-service".to_string());
    let config = ServiceConfig::from_env(&default_service_name);

    let docs = ApiDocs::build(&config)?;
    print!("{}", docs.json());
    Ok(())
}
