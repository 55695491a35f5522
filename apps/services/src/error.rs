//! # エラーハンドリング
//!
//! ハンドラで発生した失敗（[`Failure`]）と、それを HTTP レスポンスへ変換する
//! [`ErrorFormatter`] を定義する。
//!
//! ## 流れ
//!
//! ```text
//! handler ──Err(Failure)──▶ IntoResponse（レスポンス拡張に Failure を格納）
//!                                  │
//! format_failures ミドルウェア ◀───┘  リクエスト情報と合わせてログ出力 → JSON 化
//! ```
//!
//! ハンドラはリクエスト情報（パス・メソッド）を知らなくてよく、
//! `?` で返すだけでエラーレスポンスに変換される。
//! ハンドラ内の panic は `CatchPanicLayer` が [`failure_for_panic`] で
//! `Failure` に変換するため、同じ経路で整形される。

use std::{any::Any, fmt, fmt::Write as _, sync::Arc};

use axum::{
    Json,
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use storefront_shared::{ErrorResponse, error_response::DEFAULT_ERROR_MESSAGE};
use tracing_error::SpanTrace;

use crate::config::Environment;

/// ハンドラの戻り値型
pub type HandlerResult<T> = Result<T, Failure>;

/// リクエスト処理中に発生した失敗
///
/// ステータス・メッセージ・原因はいずれも任意。未設定の項目は
/// レスポンス生成時にフォールバック値（500 / `"Internal Server Error"`）になる。
/// 生成時点の [`SpanTrace`] を保持し、開発環境では `stack` として返す。
///
/// `anyhow::Error` に変換できる任意のエラーから `?` で変換できる:
///
/// ```ignore
/// async fn handler() -> HandlerResult<Json<Item>> {
///     let item = load_item().await?;
///     Ok(Json(item))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Failure {
    status:     Option<u16>,
    message:    Option<String>,
    source:     Option<Arc<anyhow::Error>>,
    span_trace: SpanTrace,
}

impl Failure {
    /// メッセージを指定して作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::unknown()
        }
    }

    /// ステータスもメッセージも持たない失敗
    pub fn unknown() -> Self {
        Self {
            status:     None,
            message:    None,
            source:     None,
            span_trace: SpanTrace::capture(),
        }
    }

    /// HTTP ステータスを指定する
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// panic のペイロードから作成する
    ///
    /// `&str` / `String` のペイロードはメッセージとして使う。
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            Some((*message).to_string())
        } else {
            payload.downcast_ref::<String>().cloned()
        };
        Self {
            message,
            ..Self::unknown()
        }
    }

    /// レスポンスに使うステータス
    ///
    /// 未設定、または 4xx / 5xx 以外の値は 500 にフォールバックする。
    pub fn status(&self) -> StatusCode {
        self.status
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|code| code.is_client_error() || code.is_server_error())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// レスポンスに使うメッセージ
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE)
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    /// 診断情報（ログと開発環境のレスポンスに使う）
    ///
    /// 1 行目はメッセージ、続いて原因のチェーンと SpanTrace を並べる。
    /// メッセージ行を必ず含むため空文字列にはならない。
    pub fn diagnostic(&self) -> String {
        let mut out = format!("Error: {}", self.message());
        if let Some(source) = &self.source {
            for cause in source.chain().skip(1) {
                let _ = write!(out, "\n    Caused by: {cause}");
            }
        }
        let trace = self.span_trace.to_string();
        if !trace.is_empty() {
            out.push('\n');
            out.push_str(&trace);
        }
        out
    }
}

impl Default for Failure {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.status().as_u16())
    }
}

impl<E> From<E> for Failure
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        let error: anyhow::Error = error.into();
        Self {
            status:     None,
            message:    Some(error.to_string()),
            source:     Some(Arc::new(error)),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl IntoResponse for Failure {
    /// ステータスのみのレスポンスを返し、本体は [`format_failures`] で整形する
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// ログ出力に使うリクエスト情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: Method,
    pub path:   String,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn of<B>(request: &axum::http::Request<B>) -> Self {
        Self::new(request.method().clone(), request.uri().path())
    }
}

/// [`Failure`] を HTTP レスポンスに変換する
///
/// 開発環境でのみ `stack` に診断情報を含める（本番で内部情報を漏らさない）。
#[derive(Debug, Clone, Default)]
pub struct ErrorFormatter {
    environment: Environment,
}

impl ErrorFormatter {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    /// レスポンスボディを組み立てる
    pub fn report(&self, failure: &Failure) -> ErrorResponse {
        let body = ErrorResponse::new(failure.message(), failure.status().as_u16());
        if self.environment.is_development() {
            body.with_stack(failure.diagnostic())
        } else {
            body
        }
    }

    /// 失敗をログに記録し、レスポンスに変換する
    ///
    /// ログはレスポンス生成より前に出力する。
    pub fn handle_error(&self, failure: &Failure, context: &RequestContext) -> Response {
        let status = failure.status();
        tracing::error!(
            http.status_code = status.as_u16(),
            http.path = %context.path,
            http.method = %context.method,
            error.detail = %failure.diagnostic(),
            "Error: {}",
            failure.message()
        );

        (status, Json(self.report(failure))).into_response()
    }
}

/// レスポンスに格納された [`Failure`] を整形するミドルウェア
///
/// `Failure` を含まないレスポンスはそのまま返す。
pub async fn format_failures(
    State(formatter): State<ErrorFormatter>,
    request: Request,
    next: Next,
) -> Response {
    let context = RequestContext::of(&request);
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<Failure>() {
        Some(failure) => formatter.handle_error(&failure, &context),
        None => response,
    }
}

/// `CatchPanicLayer::custom` 用の panic ハンドラ
pub fn failure_for_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    Failure::from_panic(payload).into_response()
}
