//! # リクエストボディの抽出
//!
//! axum の `Json` / `Form` と同じようにボディを取り出すが、失敗時は
//! プレーンテキストではなく [`Failure`] を返す。
//! 不正な JSON（400）、Content-Type の不一致（415）、ボディ上限超過（413）なども
//! ハンドラの失敗と同じ経路でログ出力・JSON 整形される。
//!
//! ```ignore
//! async fn create_item(JsonBody(item): JsonBody<NewItem>) -> HandlerResult<Json<Item>> {
//!     Ok(Json(store(item).await?))
//! }
//! ```

use axum::{
    extract::{FromRequest, Request, rejection::{FormRejection, JsonRejection}},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::Failure;

/// JSON ボディ
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

/// `application/x-www-form-urlencoded` ボディ（GET ではクエリ文字列）
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_failure(&rejection)),
        }
    }
}

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Form::<T>::from_request(req, state).await {
            Ok(axum::Form(value)) => Ok(Self(value)),
            Err(rejection) => Err(form_failure(&rejection)),
        }
    }
}

fn json_failure(rejection: &JsonRejection) -> Failure {
    rejection_failure(rejection.status(), rejection.body_text())
}

fn form_failure(rejection: &FormRejection) -> Failure {
    rejection_failure(rejection.status(), rejection.body_text())
}

fn rejection_failure(status: StatusCode, message: String) -> Failure {
    Failure::new(message).with_status(status.as_u16())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct NewItem {
        name: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/items")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_正しいjsonは値として取り出せる() {
        let JsonBody(item) =
            JsonBody::<NewItem>::from_request(request("application/json", r#"{"name":"mug"}"#), &())
                .await
                .unwrap();

        assert_eq!(item, NewItem { name: "mug".to_string() });
    }

    #[tokio::test]
    async fn test_不正なjsonは400のfailureになる() {
        let failure =
            JsonBody::<NewItem>::from_request(request("application/json", "{not json"), &())
                .await
                .unwrap_err();

        assert_eq!(failure.status(), StatusCode::BAD_REQUEST);
        assert!(failure.message().starts_with("Failed to parse the request body as JSON"));
    }

    #[tokio::test]
    async fn test_content_typeが違う場合は415のfailureになる() {
        let failure =
            JsonBody::<NewItem>::from_request(request("text/plain", r#"{"name":"mug"}"#), &())
                .await
                .unwrap_err();

        assert_eq!(failure.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_フォームの必須項目が無い場合は422のfailureになる() {
        let failure = FormBody::<NewItem>::from_request(
            request("application/x-www-form-urlencoded", "color=red"),
            &(),
        )
        .await
        .unwrap_err();

        assert_eq!(failure.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
