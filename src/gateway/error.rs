use thiserror::Error;

/// Errors raised by a push gateway. These never leave the delivery layer;
/// they are folded into `DeliveryResult::Failure`.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway configuration error: {0}")]
    Config(String),

    #[error("Failed to load service account: {0}")]
    Credentials(String),

    #[error("Failed to obtain access token: {0}")]
    Token(String),

    #[error("Push request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Push provider error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Envelope not supported by {operation}: {reason}")]
    UnsupportedTarget {
        operation: &'static str,
        reason: String,
    },
}
