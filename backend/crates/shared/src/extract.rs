//! Request extractors whose rejections use the shared error envelope

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::error::app_error::AppError;

/// `axum::Json` with failures rendered as `{ success: false, message }`
///
/// A missing field or a wrong content type becomes a 400 carrying a fixed
/// message instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::conversions::INVALID_BODY_MESSAGE;
    use crate::error::kind::ErrorKind;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Activation {
        code: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = Json::<Activation>::from_request(json_request("{}"), &())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.client_message(), INVALID_BODY_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .body(Body::from(r#"{"code":"1234"}"#))
            .unwrap();
        let err = Json::<Activation>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.client_message(),
            "Request body must be sent as application/json"
        );
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let req = json_request(r#"{"code":"1234"}"#);
        let Json(activation) = Json::<Activation>::from_request(req, &()).await.unwrap();
        assert_eq!(activation.code, "1234");
    }
}
