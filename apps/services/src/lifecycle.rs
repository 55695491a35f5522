//! # サービスのライフサイクル
//!
//! プロセスの起動から終了までを状態機械として扱う。
//!
//! ```text
//! Starting ──bind 成功──▶ Listening ──シグナル / 未捕捉の失敗──▶ ShuttingDown ──▶ Terminated
//!     │                                                                              ▲
//!     └──────────────────────────── 起動失敗（即時終了） ───────────────────────────────┘
//! ```
//!
//! - シャットダウン要求は最初の 1 回だけが有効（以降の要求は無視）
//! - ShuttingDown では新規接続を止め、処理中のリクエストの完了を待つ
//! - 待機は [`SHUTDOWN_TIMEOUT`] で打ち切り、終了コード 1 で強制終了する
//!
//! シグナルハンドラからは [`Lifecycle::request_shutdown`] を呼ぶだけにして、
//! 順序制御とタイムアウトは [`Lifecycle::supervise`] に集約する。

use std::{any::Any, fmt, future::Future, io, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Context as _;
use tokio::{sync::watch, task::JoinHandle};

/// graceful shutdown の猶予時間
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// ライフサイクルの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceState {
    Starting,
    Listening,
    ShuttingDown,
    Terminated,
}

/// 終了シグナルの種類（どちらも同じように扱う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum TerminationSignal {
    #[strum(serialize = "SIGTERM")]
    Terminate,
    #[strum(serialize = "SIGINT")]
    Interrupt,
}

/// シャットダウンのきっかけ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// 外部からの終了シグナル
    Signal(TerminationSignal),
    /// どのハンドラにも捕捉されなかった失敗（値は診断メッセージ）
    UncaughtFailure(String),
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(signal) => write!(f, "{signal}"),
            Self::UncaughtFailure(_) => f.write_str("UNCAUGHT_EXCEPTION"),
        }
    }
}

/// プロセスの終了結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// graceful shutdown が猶予時間内に完了した
    Graceful,
    /// 猶予時間内に完了せず強制終了した
    ForcedTimeout,
    /// 未捕捉の失敗による終了（graceful shutdown は実施済み）
    UncaughtFailure,
    /// 起動に失敗した
    StartupFailure,
}

impl ExitOutcome {
    /// プロセスの終了コード
    pub fn code(self) -> u8 {
        match self {
            Self::Graceful => 0,
            Self::ForcedTimeout | Self::UncaughtFailure | Self::StartupFailure => 1,
        }
    }
}

impl From<ExitOutcome> for ExitCode {
    fn from(outcome: ExitOutcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// ライフサイクルの状態とシャットダウン要求を共有するハンドル
///
/// `Clone` は同じ状態を指す。
#[derive(Clone)]
pub struct Lifecycle {
    inner: Arc<Inner>,
}

struct Inner {
    state:  watch::Sender<ServiceState>,
    reason: watch::Sender<Option<ShutdownReason>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ServiceState::Starting);
        let (reason, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner { state, reason }),
        }
    }

    /// 現在の状態
    pub fn state(&self) -> ServiceState {
        *self.inner.state.borrow()
    }

    /// 状態の変化を購読する
    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.inner.state.subscribe()
    }

    /// 受理済みのシャットダウン要求
    pub fn shutdown_reason(&self) -> Option<ShutdownReason> {
        self.inner.reason.borrow().clone()
    }

    /// Starting → Listening に遷移する
    ///
    /// Starting 以外からは遷移しない（`false` を返す）。
    pub fn mark_listening(&self) -> bool {
        self.inner.state.send_if_modified(|state| {
            if *state == ServiceState::Starting {
                *state = ServiceState::Listening;
                true
            } else {
                false
            }
        })
    }

    /// Terminated に遷移する
    pub fn mark_terminated(&self) {
        self.inner.state.send_replace(ServiceState::Terminated);
    }

    /// シャットダウンを要求する
    ///
    /// 最初の要求のみ受理して ShuttingDown に遷移し、`true` を返す。
    /// 受理済みの場合は何もせず `false` を返す。
    pub fn request_shutdown(&self, reason: ShutdownReason) -> bool {
        let accepted = self.inner.reason.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });

        if accepted {
            self.inner.state.send_if_modified(|state| match state {
                ServiceState::Starting | ServiceState::Listening => {
                    *state = ServiceState::ShuttingDown;
                    true
                }
                ServiceState::ShuttingDown | ServiceState::Terminated => false,
            });
        }
        accepted
    }

    /// 未捕捉の失敗を記録し、シャットダウンを要求する
    pub fn raise_uncaught(&self, detail: impl Into<String>) -> bool {
        let detail = detail.into();
        tracing::error!(error.detail = %detail, "Uncaught Exception");
        self.request_shutdown(ShutdownReason::UncaughtFailure(detail))
    }

    /// シャットダウン要求を待つ
    ///
    /// 要求済みの場合は即座に返る。
    pub async fn shutdown_requested(&self) -> ShutdownReason {
        let mut receiver = self.inner.reason.subscribe();
        if let Ok(reason) = receiver.wait_for(Option::is_some).await {
            if let Some(reason) = reason.as_ref() {
                return reason.clone();
            }
        }
        // Sender は self が保持しているため、ここには到達しない
        std::future::pending().await
    }

    /// リクエスト外で動くバックグラウンドタスクを監視付きで起動する
    ///
    /// タスクが `Err` を返した場合はログに記録したうえで未捕捉の失敗として再送出し、
    /// panic した場合も同様にシャットダウンを要求する。
    pub fn spawn_supervised<F>(&self, name: &'static str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let lifecycle = self.clone();
        let handle = tokio::spawn(task);

        tokio::spawn(async move {
            let detail = match handle.await {
                Ok(Ok(())) => return,
                Ok(Err(error)) => {
                    tracing::error!(task = name, error = ?error, "Unhandled Rejection");
                    format!("{error:#}")
                }
                Err(join_error) if join_error.is_panic() => panic_message(join_error.into_panic()),
                // 中断（abort）は失敗として扱わない
                Err(_) => return,
            };
            lifecycle.raise_uncaught(format!("{name}: {detail}"));
        })
    }

    /// サーバーを監視し、シャットダウン要求から終了までを制御する
    ///
    /// `server` は graceful shutdown が組み込まれたサーバータスク
    /// （[`shutdown_requested`](Self::shutdown_requested) で停止を開始するもの）。
    pub async fn supervise(
        &self,
        mut server: JoinHandle<io::Result<()>>,
        grace_period: Duration,
    ) -> ExitOutcome {
        let reason = tokio::select! {
            // 要求済みなら、サーバーが先に停止していても要求による停止として扱う
            biased;
            reason = self.shutdown_requested() => reason,
            result = &mut server => {
                // シャットダウン要求前にサーバーが止まった
                let detail = match result {
                    Ok(Ok(())) => "HTTP サーバーが予期せず停止しました".to_string(),
                    Ok(Err(error)) => format!("HTTP サーバーが停止しました: {error}"),
                    Err(join_error) => format!("HTTP サーバータスクが異常終了しました: {join_error}"),
                };
                self.raise_uncaught(detail);
                self.mark_terminated();
                return ExitOutcome::UncaughtFailure;
            }
        };

        tracing::info!(
            shutdown.reason = %reason,
            "{reason} を受信しました。graceful shutdown を開始します"
        );

        let outcome = match tokio::time::timeout(grace_period, &mut server).await {
            Ok(result) => {
                match result {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        tracing::error!(error = %error, "サーバーの停止中にエラーが発生しました");
                    }
                    Err(join_error) => {
                        tracing::error!(error = %join_error, "サーバータスクが異常終了しました");
                    }
                }
                tracing::info!("サーバーを停止しました。プロセスを終了します");
                match reason {
                    ShutdownReason::Signal(_) => ExitOutcome::Graceful,
                    ShutdownReason::UncaughtFailure(_) => ExitOutcome::UncaughtFailure,
                }
            }
            Err(_) => {
                server.abort();
                tracing::error!(
                    timeout_secs = grace_period.as_secs_f64(),
                    "Forced shutdown due to timeout"
                );
                ExitOutcome::ForcedTimeout
            }
        };

        self.mark_terminated();
        outcome
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("state", &self.state())
            .field("shutdown_reason", &self.shutdown_reason())
            .finish()
    }
}

/// SIGTERM または SIGINT を待つ
pub async fn wait_for_termination_signal() -> io::Result<TerminationSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                Ok(TerminationSignal::Interrupt)
            }
            _ = terminate.recv() => Ok(TerminationSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(TerminationSignal::Interrupt)
    }
}

/// 終了シグナルを受けたらシャットダウンを要求する
pub async fn listen_for_signals(lifecycle: Lifecycle) -> anyhow::Result<()> {
    let signal = wait_for_termination_signal()
        .await
        .context("シグナルハンドラの登録に失敗しました")?;
    lifecycle.request_shutdown(ShutdownReason::Signal(signal));
    Ok(())
}

fn panic_message(payload: Box<dyn Any + Send + 'static>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
