//! Request body extractors.

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AppError;

/// JSON request body whose parse failures surface as
/// [`AppError::Validation`] (400) instead of axum's 415/422 rejections.
///
/// Responses keep using [`axum::Json`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection_message(&rejection))
    }
}

/// Client-facing text for a rejected JSON body.
fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(e) => std::error::Error::source(e).map_or_else(
            || "invalid request body".to_owned(),
            |source| format!("invalid request body: {source}"),
        ),
        JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON".to_owned(),
        JsonRejection::MissingJsonContentType(_) => {
            "expected Content-Type: application/json".to_owned()
        }
        other => other.body_text(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        response::IntoResponse,
    };
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Titled {
        #[allow(dead_code)]
        title: String,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Result<Titled, AppError> {
        let mut request = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_owned())).unwrap();
        JsonBody::<Titled>::from_request(request, &())
            .await
            .map(|JsonBody(body)| body)
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        assert!(extract(Some("application/json"), r#"{"title": "x"}"#).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejections_become_bad_request() {
        let cases = [
            (Some("application/json"), "{}", "missing field `title`"),
            (Some("application/json"), "{not json", "not valid JSON"),
            (None, r#"{"title": "x"}"#, "Content-Type"),
        ];
        for (content_type, body, expected) in cases {
            let err = extract(content_type, body).await.unwrap_err();
            assert!(
                matches!(&err, AppError::Validation(msg) if msg.contains(expected)),
                "{err:?}"
            );
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
