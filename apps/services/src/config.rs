//! # サービス設定
//!
//! 環境変数からサービスの設定を読み込む。
//!
//! どの値も不正・未設定の場合はデフォルト値にフォールバックし、
//! 読み込み自体は決して失敗しない。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|------------|------|
//! | `HOST` | `0.0.0.0` | バインドアドレス |
//! | `PORT` | `3000` | ポート番号（1〜65535） |
//! | `SERVICE_NAME` | サービスごとの識別子 | ログ・ドキュメント・ヘルスチェックに使う名前 |
//! | `ENVIRONMENT` | `development` | 実行環境（`development` / `production` / `test`） |
//! | `APP_ENV` | - | `ENVIRONMENT` 未設定時の別名 |

use std::{env, fmt};

/// `PORT` 未設定・不正時のポート番号
pub const DEFAULT_PORT: u16 = 3000;

/// `HOST` 未設定時のバインドアドレス
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// 実行環境
///
/// `Development` のときのみエラーレスポンスに診断情報を含める。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
    /// 上記以外のタグ（値はトリム済みの元の文字列）
    Other(String),
}

impl Environment {
    /// 環境タグをパースする
    ///
    /// 大文字小文字は区別しない。空文字列は `Development` とみなす。
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "development" => Self::Development,
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// サービスの設定
///
/// プロセス起動時に一度だけ構築し、以降は不変のまま `Arc` で各コンポーネントに渡す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// サービス名
    pub service_name: String,
    /// 実行環境
    pub environment:  Environment,
}

impl ServiceConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `default_service_name` は `SERVICE_NAME` 未設定時に使うサービス固有の識別子。
    pub fn from_env(default_service_name: &str) -> Self {
        Self::from_lookup(default_service_name, |key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    ///
    /// プロセスの環境変数を書き換えずにテストするための入口。
    pub fn from_lookup<F>(default_service_name: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            host:         non_empty_or(lookup("HOST"), DEFAULT_HOST),
            port:         parse_port(lookup("PORT").as_deref()),
            service_name: non_empty_or(lookup("SERVICE_NAME"), default_service_name),
            environment:  lookup("ENVIRONMENT")
                .or_else(|| lookup("APP_ENV"))
                .map(|value| Environment::parse(&value))
                .unwrap_or_default(),
        }
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ローカルからアクセスするためのベース URL
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}

/// `PORT` をパースする
///
/// 前後の空白は無視する。数値でない・負数・0・範囲外はすべて [`DEFAULT_PORT`]。
fn parse_port(value: Option<&str>) -> u16 {
    value
        .and_then(|raw| raw.trim().parse::<u16>().ok())
        .filter(|port| *port > 0)
        .unwrap_or(DEFAULT_PORT)
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
