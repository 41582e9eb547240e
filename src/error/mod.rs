use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("API key is required")]
    Unauthenticated,

    #[error("Invalid API key")]
    Forbidden,

    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Delivery failed ({context}): {details}")]
    DeliveryFailed { context: String, details: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::DeliveryFailed { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Failure envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            field: None,
            details: None,
            timestamp: Utc::now(),
        }
    }
}

/// Client message for internal errors in production mode
pub const MASKED_INTERNAL_MESSAGE: &str = "Something went wrong!";

/// Response extension marking a 500 rendered from an internal error.
///
/// Lets the server mask the detail in production without the error type
/// knowing the operating mode.
#[derive(Debug, Clone, Copy)]
pub struct InternalErrorMarker;

/// Build the 500 envelope for an internal failure, hiding `detail` when
/// `production` is set
pub fn internal_error_response(detail: &str, production: bool) -> Response {
    let message = if production {
        MASKED_INTERNAL_MESSAGE
    } else {
        detail
    };

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error", message)),
    )
        .into_response();
    response.extensions_mut().insert(InternalErrorMarker);
    response
}

/// Human-readable error/message pair for a missing or malformed field
fn field_messages(field: &str, reason: &str) -> (String, String) {
    match field {
        "title" => ("Title is required".into(), "Title must be a non-empty string".into()),
        "message" => (
            "Message is required".into(),
            "Message must be a non-empty string".into(),
        ),
        "token" => ("Token is required".into(), "FCM token must be provided".into()),
        _ => (format!("Invalid field: {}", field), reason.to_string()),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Unauthenticated => {
                tracing::warn!("Missing API key");
                ErrorResponse::new(
                    "API key is required",
                    "Provide API key in x-api-key header or Authorization header",
                )
            }
            AppError::Forbidden => {
                tracing::warn!("Invalid API key provided");
                ErrorResponse::new("Invalid API key", "The provided API key is not valid")
            }
            AppError::Validation { field, reason } => {
                tracing::debug!(field = %field, reason = %reason, "Request validation failed");
                let (error, message) = field_messages(field, reason);
                ErrorResponse {
                    field: Some(field.clone()),
                    ..ErrorResponse::new(error, message)
                }
            }
            AppError::DeliveryFailed { context, details } => {
                tracing::error!(context = %context, details = %details, "Notification delivery failed");
                ErrorResponse {
                    details: Some(details.clone()),
                    ..ErrorResponse::new(
                        format!("Failed to send {}", context),
                        "The push gateway rejected the notification",
                    )
                }
            }
            AppError::Config(_) | AppError::Internal(_) => {
                let log_message = self.to_string();
                tracing::error!(status = %status.as_u16(), message = %log_message, "Internal error");
                return internal_error_response(&log_message, false);
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Validation {
                field: "title".into(),
                reason: "missing".into(),
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::DeliveryFailed {
                context: "test notification".into(),
                details: "quota exceeded".into(),
            }
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_field_messages() {
        let (error, _) = field_messages("title", "missing");
        assert_eq!(error, "Title is required");

        let (error, message) = field_messages("token", "empty");
        assert_eq!(error, "Token is required");
        assert_eq!(message, "FCM token must be provided");

        let (error, message) = field_messages("imageUrl", "must be a string");
        assert_eq!(error, "Invalid field: imageUrl");
        assert_eq!(message, "must be a string");
    }

    #[test]
    fn test_internal_error_response_masking() {
        let response = internal_error_response("pool exhausted", true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalErrorMarker>().is_some());

        let response = AppError::Internal("pool exhausted".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalErrorMarker>().is_some());

        let response = AppError::Forbidden.into_response();
        assert!(response.extensions().get::<InternalErrorMarker>().is_none());
    }
}
