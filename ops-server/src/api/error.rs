use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// RFC 9457 Problem Details
/// https://www.rfc-editor.org/rfc/rfc9457.html
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem type
    pub title: String,

    /// HTTP status code for this occurrence
    pub status: u16,

    /// Human-readable explanation of this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI reference identifying this specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Resource not found (404 Not Found)
    pub fn not_found(resource: impl Into<String>) -> Self {
        let status = StatusCode::NOT_FOUND;
        Self::new(
            "https://orbitdeck.example.com/errors/not-found",
            status.canonical_reason().unwrap_or("Not Found"),
            status,
        )
        .with_detail(format!("{} not found", resource.into()))
    }

    /// Validation failure (400 Bad Request)
    pub fn validation_error(detail: impl Into<String>) -> Self {
        let status = StatusCode::BAD_REQUEST;
        Self::new(
            "https://orbitdeck.example.com/errors/validation",
            status.canonical_reason().unwrap_or("Bad Request"),
            status,
        )
        .with_detail(detail)
    }

    /// Internal server error (500 Internal Server Error)
    pub fn internal_error(detail: impl Into<String>) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self::new(
            "https://orbitdeck.example.com/errors/internal",
            status.canonical_reason().unwrap_or("Internal Server Error"),
            status,
        )
        .with_detail(detail)
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Content-Type mandated by RFC 9457
        let mut response = (status, Json(self)).into_response();

        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}

/// Handler result: T on success, ProblemDetails on failure
pub type ApiResult<T> = Result<T, ProblemDetails>;
