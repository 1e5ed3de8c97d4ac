//! Response construction helpers.
//!
//! # Responsibilities
//! - Uniform `{"error": "..."}` JSON bodies
//! - Gate redirects
//! - Security response headers
//!
//! # Design Decisions
//! - Redirects are 307 so the method and body are preserved
//! - Security headers never overwrite headers set by the upstream

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `status` with a JSON error body.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Temporary redirect to `target`.
pub fn redirect(target: &str) -> Response {
    Redirect::temporary(target).into_response()
}

/// Security headers added to every response when enabled.
pub fn security_header_layers() -> Vec<SetResponseHeaderLayer<HeaderValue>> {
    [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    ]
    .into_iter()
    .map(|(name, value): (HeaderName, &'static str)| {
        SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_json_error_body() {
        let res = json_error(StatusCode::NOT_FOUND, "No results found.");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "No results found."}));
    }

    #[test]
    fn test_redirect_location() {
        let res = redirect("/login");
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(res.headers()[header::LOCATION], "/login");
    }
}
