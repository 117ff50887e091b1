use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Helper to create a JSON error response with a standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// The request field a validation failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Body,
    Query,
    Params,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Query => "query",
            Source::Params => "params",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced to the host's error pipeline as an HTTP response.
///
/// All failures are terminal for the current request; there are no retries.
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
    /// Schema rejected body/query/params; carries the first offending field.
    Validation {
        source: Source,
        field: String,
        message: String,
    },
    Custom {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl ApiError {
    pub fn validation(
        source: Source,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ApiError::Validation {
            source,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) | ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Custom { status, .. } => *status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation {
                source,
                field,
                message,
            } => {
                let body = serde_json::json!({
                    "error": "Validation failed",
                    "details": {
                        "source": source.as_str(),
                        "field": field,
                        "message": message,
                    },
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Custom { status, body } => (status, Json(body)).into_response(),
            other => {
                let status = other.status();
                let message = match other {
                    ApiError::NotFound(msg)
                    | ApiError::Unauthorized(msg)
                    | ApiError::Forbidden(msg)
                    | ApiError::BadRequest(msg)
                    | ApiError::Internal(msg) => msg,
                    ApiError::Validation { .. } | ApiError::Custom { .. } => unreachable!(),
                };
                error_response(status, message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ApiError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            ApiError::Validation { source, field, message } => {
                write!(f, "Validation Error ({source}.{field}): {message}")
            }
            ApiError::Custom { status, body } => write!(f, "Custom Error ({status}): {body}"),
        }
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
