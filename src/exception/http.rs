use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;

/// A classified request error: carries the HTTP status and structured payload
/// the caller is meant to receive.
///
/// # Example
/// ```
/// use switchboard::HttpException;
///
/// let error = HttpException::not_found("user 42 not found");
/// assert_eq!(error.status.as_u16(), 404);
/// ```
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HttpException {
    pub status: StatusCode,
    pub message: String,
    pub payload: Option<Value>,
}

impl HttpException {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            payload: None,
        }
    }

    /// Attach a structured payload surfaced under `details` in the envelope.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The structured payload rendered into the error envelope's `data`
    /// field: status code, message, timestamp, plus any attached details.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "statusCode": self.status.as_u16(),
            "message": self.message,
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(details) = &self.payload {
            payload["details"] = details.clone();
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_status_and_message() {
        let payload = HttpException::not_found("missing").to_payload();
        assert_eq!(payload["statusCode"], 404);
        assert_eq!(payload["message"], "missing");
        assert!(payload["timestamp"].is_string());
        assert!(payload.get("details").is_none());
    }

    #[test]
    fn attached_details_are_included() {
        let payload = HttpException::conflict("taken")
            .with_payload(json!({"field": "email"}))
            .to_payload();
        assert_eq!(payload["details"]["field"], "email");
    }
}
