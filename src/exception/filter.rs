//! Terminal error handling: converts unmatched requests and handler failures
//! into the uniform response envelope.

use crate::common::Envelope;
use crate::exception::HandlerError;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

/// Stage one: no mounted route matched the request.
pub fn not_found(method: &Method, path: &str) -> Response {
    tracing::warn!(%method, %path, "no route matched");
    Envelope::error(StatusCode::NOT_FOUND, "Not Found", None).into_response()
}

/// Stage two: a middleware, transformer, or handler failed.
///
/// Classified exceptions keep their status and payload. Anything else is a
/// server defect: the underlying message is logged here and never reaches
/// the caller.
pub fn render(error: HandlerError) -> Response {
    match error {
        HandlerError::Exception(exception) => Envelope::error(
            exception.status,
            exception.message.clone(),
            Some(exception.to_payload()),
        )
        .into_response(),
        HandlerError::Unexpected(error) => {
            tracing::error!(error = %error, "unhandled error while serving request");
            Envelope::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                Some(json!({
                    "statusCode": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    "timestamp": Utc::now().to_rfc3339(),
                })),
            )
            .into_response()
        }
    }
}
