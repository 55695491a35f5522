//! # サービスの起動
//!
//! 設定の読み込みから HTTP サーバーの待ち受け、終了までを担当する。
//!
//! ## 起動手順
//!
//! 1. `.env` の読み込み、設定の構築、トレーシングの初期化（[`launch`]）
//! 2. OpenAPI ドキュメントの生成と `docs/swagger.json` への書き出し
//! 3. ルーターの構築（[`build_app`]）
//! 4. ポートのバインドと待ち受け開始（Starting → Listening）
//! 5. シグナル監視の開始と、シャットダウンまでの待機（[`Lifecycle::supervise`]）
//!
//! 手順 2〜4 のいずれかに失敗した場合は、待ち受けを始めずに終了コード 1 で終了する。

use std::{
    io,
    net::SocketAddr,
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use axum::Router;
use storefront_shared::{
    Clock,
    SystemClock,
    observability::{self, TracingConfig},
};
use thiserror::Error;
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::Instrument as _;

use crate::{
    app_builder::build_app,
    config::ServiceConfig,
    lifecycle::{ExitOutcome, Lifecycle, SHUTDOWN_TIMEOUT, listen_for_signals},
    openapi::{ApiDocs, DOCS_DIR, PublishError},
};

/// 起動時のエラー
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Docs(#[from] PublishError),

    #[error("{address} へのバインドに失敗しました: {source}")]
    Bind {
        address: String,
        #[source]
        source:  io::Error,
    },
}

/// サービスの起動設定
///
/// ```ignore
/// let service = ServiceBootstrap::new(config)
///     .with_routes(cart_routes())
///     .start()
///     .await?;
/// let outcome = service.wait().await;
/// ```
pub struct ServiceBootstrap {
    config:           ServiceConfig,
    routes:           Router,
    docs_dir:         PathBuf,
    shutdown_timeout: Duration,
    clock:            Arc<dyn Clock>,
    lifecycle:        Lifecycle,
}

impl ServiceBootstrap {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            routes: Router::new(),
            docs_dir: PathBuf::from(DOCS_DIR),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            clock: Arc::new(SystemClock),
            lifecycle: Lifecycle::new(),
        }
    }

    /// サービス固有のルートを追加する
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// OpenAPI ドキュメントの書き出し先を変更する
    pub fn with_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = dir.into();
        self
    }

    /// graceful shutdown の猶予時間を変更する
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// このサービスのライフサイクル
    ///
    /// 起動前に取得しておけば、テストや組み込み先からシャットダウンを要求できる。
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    /// ドキュメントを書き出し、ポートをバインドして待ち受けを開始する
    pub async fn start(self) -> Result<RunningService, BootstrapError> {
        let docs = ApiDocs::build(&self.config)?;
        let docs_path = docs.persist(&self.docs_dir)?;
        tracing::debug!(path = %docs_path.display(), "OpenAPI ドキュメントを書き出しました");

        let app = build_app(&self.config, &docs, self.clock, self.routes);

        let address = self.config.bind_address();
        let bind_error = |source| BootstrapError::Bind {
            address: address.clone(),
            source,
        };
        let listener = TcpListener::bind(address.as_str()).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        self.lifecycle.mark_listening();
        let port = local_addr.port();
        tracing::info!(
            service = %self.config.service_name,
            address = %local_addr,
            "{} がポート {} で起動しました",
            self.config.service_name,
            port
        );
        tracing::info!("API ドキュメント: http://localhost:{port}/docs");
        tracing::info!("ヘルスチェック: http://localhost:{port}/health");
        tracing::info!(environment = %self.config.environment, "実行環境: {}", self.config.environment);

        let shutdown = {
            let lifecycle = self.lifecycle.clone();
            async move {
                lifecycle.shutdown_requested().await;
            }
        };
        let server = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown)
            .await
        });

        Ok(RunningService {
            local_addr,
            lifecycle: self.lifecycle,
            server,
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

/// 待ち受け中のサービス
pub struct RunningService {
    local_addr:       SocketAddr,
    lifecycle:        Lifecycle,
    server:           JoinHandle<io::Result<()>>,
    shutdown_timeout: Duration,
}

impl RunningService {
    /// 実際にバインドしたアドレス（ポート 0 指定時の確認用）
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// シャットダウンが完了するまで待つ
    pub async fn wait(self) -> ExitOutcome {
        self.lifecycle
            .supervise(self.server, self.shutdown_timeout)
            .await
    }
}

/// サービスを起動し、終了まで待つ
///
/// 終了シグナルの監視もここで開始する。
pub async fn run(bootstrap: ServiceBootstrap) -> ExitOutcome {
    let lifecycle = bootstrap.lifecycle();

    match bootstrap.start().await {
        Ok(service) => {
            lifecycle.spawn_supervised("signal-listener", listen_for_signals(lifecycle.clone()));
            service.wait().await
        }
        Err(error) => {
            tracing::error!(error = %error, "サーバーの起動に失敗しました");
            lifecycle.mark_terminated();
            ExitOutcome::StartupFailure
        }
    }
}

/// サービスのエントリーポイント
///
/// `default_service_name` は `SERVICE_NAME` 未設定時に名乗るサービス識別子。
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> ExitCode {
///     storefront_services::launch("cart-service").await
/// }
/// ```
pub async fn launch(default_service_name: &str) -> ExitCode {
    // .env は任意（本番では環境変数を直接設定する）
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env(default_service_name);
    observability::init_tracing(TracingConfig::from_env(config.service_name.clone()));

    let span = tracing::info_span!("app", service = %config.service_name);
    run(ServiceBootstrap::new(config))
        .instrument(span)
        .await
        .into()
}
