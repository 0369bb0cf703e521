use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use strum_macros::Display;

/// Whether an envelope reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// The uniform response shape every request resolves to.
///
/// Success and failure share one formatter so callers always parse the same
/// envelope: `{"status": "success", "data": ...}` or
/// `{"status": "error", "message": ..., "data": ...}`.
///
/// # Example
/// ```
/// use switchboard::Envelope;
/// use serde_json::json;
///
/// let body = serde_json::to_value(Envelope::success(json!({"id": "42"}))).unwrap();
/// assert_eq!(body["status"], "success");
/// assert_eq!(body["data"]["id"], "42");
/// ```
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: ResponseStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(skip)]
    http_status: StatusCode,
}

impl Envelope {
    /// A `200 OK` success envelope wrapping the handler's return value.
    pub fn success(data: Value) -> Self {
        Self::success_with_status(data, StatusCode::OK)
    }

    pub fn success_with_status(data: Value, status: StatusCode) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
            http_status: status,
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
            data,
            http_status: status,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        self.http_status
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.http_status, Json(self)).into_response()
    }
}
