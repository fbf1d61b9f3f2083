use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// ServiceResult
///
/// The envelope returned by every service operation: an HTTP-shaped status
/// code plus either a payload or an error message. The payload lives inside
/// the internal `Result`, so reading a value out of a failed envelope is
/// unrepresentable rather than yielding a sentinel.
///
/// Operations without a payload use `ServiceResult<()>`.
#[derive(Debug)]
pub struct ServiceResult<T> {
    status: StatusCode,
    outcome: Result<T, String>,
}

impl<T> ServiceResult<T> {
    /// A successful result carrying a payload.
    pub fn success(value: T, status: StatusCode) -> Self {
        Self {
            status,
            outcome: Ok(value),
        }
    }

    /// A failed result with a single error message.
    pub fn failure(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            outcome: Err(error.into()),
        }
    }

    /// A failed result built from several messages, joined into one
    /// delimited string so the boundary always ships a single error field.
    pub fn failure_all(status: StatusCode, errors: Vec<String>) -> Self {
        Self::failure(status, errors.join(","))
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The payload, present only on success.
    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn into_value(self) -> Option<T> {
        self.outcome.ok()
    }

    /// The error message, present only on failure.
    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

impl ServiceResult<()> {
    /// A successful result with no payload.
    pub fn ok(status: StatusCode) -> Self {
        Self::success((), status)
    }
}

/// Translates the envelope into a transport response at the boundary.
/// Success serializes the payload directly (no body for unit payloads or
/// 204); failure ships `{"error": "..."}`. Internal diagnostics never make
/// it into the body.
impl<T: Serialize> IntoResponse for ServiceResult<T> {
    fn into_response(self) -> Response {
        match self.outcome {
            Ok(value) => {
                let body = serde_json::to_value(&value).unwrap_or(serde_json::Value::Null);
                if body.is_null() || self.status == StatusCode::NO_CONTENT {
                    self.status.into_response()
                } else {
                    (self.status, Json(body)).into_response()
                }
            }
            Err(error) => (self.status, Json(serde_json::json!({ "error": error }))).into_response(),
        }
    }
}
