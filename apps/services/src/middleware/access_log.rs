//! # アクセスログ
//!
//! リクエストを受け付けた時点で、メソッド・パス・クライアントアドレス・
//! User-Agent を INFO レベルで 1 行出力する tower Layer。
//!
//! ハンドラの完了を待たずに出力するため、応答しないリクエストも記録に残る。
//! TraceLayer の内側に配置し、`request_id` を含むスパン内で出力する:
//!
//! ```text
//! SetRequestId → TraceLayer → AccessLogLayer → [他のミドルウェア] → handler
//! ```

use std::{
    net::SocketAddr,
    task::{Context, Poll},
};

use axum::{
    extract::ConnectInfo,
    http::{Request, header},
};
use tower::{Layer, Service};

/// アクセスログを出力する Layer
#[derive(Clone, Copy, Debug, Default)]
pub struct AccessLogLayer;

impl<S> Layer<S> for AccessLogLayer {
    type Service = AccessLogService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AccessLogService { inner }
    }
}

/// [`AccessLogLayer`] が生成する Service
#[derive(Clone, Debug)]
pub struct AccessLogService<S> {
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for AccessLogService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Error = S::Error;
    type Future = S::Future;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        log_request(&req);
        self.inner.call(req)
    }
}

fn log_request<B>(req: &Request<B>) {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info!(
        http.method = %req.method(),
        http.path = %req.uri().path(),
        client.address = %client,
        http.user_agent = %user_agent,
        "{} {}",
        req.method(),
        req.uri().path()
    );
}
