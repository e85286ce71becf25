//! API response envelope.
//!
//! Every endpoint answers with the same JSON shape:
//! `{"status": "success" | "error", "message": ..., "data": ...}`.
//! The response cache middleware keys its "may I cache this" decision on the
//! `status` field, so handlers must not bypass this envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_core::{CampusError, ErrorDetail};
use serde::{Deserialize, Serialize};

/// Envelope status discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Standard API response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    /// Creates a successful response with a message.
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<ErrorDetail> {
    /// Creates an error response from a `CampusError`.
    ///
    /// Uses the client-facing message, so token verification failures stay
    /// indistinguishable on the wire.
    #[must_use]
    pub fn error(error: &CampusError) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(error.client_message()),
            data: Some(ErrorDetail::from_error(error)),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub CampusError);

impl From<CampusError> for AppError {
    fn from(err: CampusError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ApiResponse::error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success response.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Minimal view of the envelope used when inspecting buffered response
/// bodies. Anything that does not parse, or whose status is not `success`,
/// is never cached and never triggers invalidation.
#[derive(Debug, Deserialize)]
pub(crate) struct EnvelopeProbe {
    pub status: ResponseStatus,
}

pub(crate) fn body_is_success(body: &[u8]) -> bool {
    matches!(
        serde_json::from_slice::<EnvelopeProbe>(body),
        Ok(EnvelopeProbe {
            status: ResponseStatus::Success,
        })
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2, 3])).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("message").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = CampusError::not_found("Course", 7);
        let body = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["data"]["code"], "NOT_FOUND");
    }

    #[test]
    fn test_error_envelope_hides_token_cause() {
        let err = CampusError::InvalidToken("signature mismatch".to_string());
        let body = serde_json::to_string(&ApiResponse::error(&err)).unwrap();
        assert!(!body.contains("signature"));
        assert!(body.contains("invalid or expired token"));
    }

    #[test]
    fn test_body_probe_accepts_only_success() {
        assert!(body_is_success(br#"{"status":"success","data":[]}"#));
        assert!(!body_is_success(br#"{"status":"error","message":"nope"}"#));
        assert!(!body_is_success(b"not json"));
        assert!(!body_is_success(br#"{"other":"shape"}"#));
    }
}
