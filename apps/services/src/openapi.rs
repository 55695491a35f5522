//! # OpenAPI ドキュメント
//!
//! utoipa で共通エンドポイントの OpenAPI ドキュメントを生成し、
//! ファイルへの書き出しと `/docs` での配信に使う。
//!
//! `info` と `servers` はサービスの設定から埋めるため、
//! 同じ設定からは常に同じドキュメント（バイト単位で一致）が得られる。

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use storefront_shared::{ErrorResponse, HealthResponse, NotFoundResponse};
use thiserror::Error;
use utoipa::{
    OpenApi,
    openapi::{self, Contact, Info, Server},
};

use crate::{config::ServiceConfig, handler::health};

/// ドキュメントの書き出し先ディレクトリ（作業ディレクトリからの相対パス）
pub const DOCS_DIR: &str = "docs";

/// 書き出すファイル名
pub const DOCS_FILE_NAME: &str = "swagger.json";

/// API バージョン
pub const API_VERSION: &str = "1.0.0";

#[derive(OpenApi)]
#[openapi(
   paths(health::health_check),
   components(schemas(HealthResponse, ErrorResponse, NotFoundResponse)),
   tags(
      (name = "Health", description = "ヘルスチェック")
   )
)]
pub struct ApiDoc;

/// ドキュメント生成・書き出しのエラー
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("OpenAPI ドキュメントのシリアライズに失敗しました: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("OpenAPI ドキュメントの書き出しに失敗しました（{path}）: {source}")]
    Write {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

/// サービス設定から OpenAPI ドキュメントを組み立てる
pub fn build_spec(config: &ServiceConfig) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    let mut contact = Contact::new();
    contact.name = Some("API Support".to_string());

    let mut info = Info::new(config.service_name.as_str(), API_VERSION);
    info.description = Some(format!("{} API Documentation", config.service_name));
    info.contact = Some(contact);
    doc.info = info;

    let mut server = Server::new(config.local_url());
    server.description = Some("Development server".to_string());
    doc.servers = Some(vec![server]);

    doc
}

/// 起動時に一度だけ生成する API ドキュメント一式
///
/// 書き出すファイルと `/docs.json` の応答は同じ文字列を共有する。
#[derive(Debug, Clone)]
pub struct ApiDocs {
    document: Arc<openapi::OpenApi>,
    json:     Arc<str>,
    viewer:   Arc<str>,
}

impl ApiDocs {
    pub fn build(config: &ServiceConfig) -> Result<Self, PublishError> {
        let document = build_spec(config);
        let json = document.to_pretty_json()?;
        let viewer = render_viewer(&format!("{} API Docs", config.service_name));

        Ok(Self {
            document: Arc::new(document),
            json:     json.into(),
            viewer:   viewer.into(),
        })
    }

    pub fn document(&self) -> &openapi::OpenApi {
        &self.document
    }

    /// 整形済み JSON
    pub fn json(&self) -> &str {
        &self.json
    }

    /// Swagger UI の HTML
    pub fn viewer_html(&self) -> &str {
        &self.viewer
    }

    /// `dir/swagger.json` に書き出す
    ///
    /// ディレクトリが無ければ作成し、既存ファイルは上書きする。
    pub fn persist(&self, dir: &Path) -> Result<PathBuf, PublishError> {
        fs::create_dir_all(dir).map_err(|source| PublishError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(DOCS_FILE_NAME);
        fs::write(&path, self.json.as_bytes()).map_err(|source| PublishError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Swagger UI のページを生成する
///
/// 上部バーは非表示にし、`/docs.json` を読み込む。
fn render_viewer(title: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
  <style>.swagger-ui .topbar {{ display: none }}</style>
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "/docs.json", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##,
        title = escape_html(title)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
