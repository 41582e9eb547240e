//! Push gateway abstraction.
//!
//! The delivery layer talks to the push provider only through
//! [`PushGateway`]. Implementations:
//!
//! - `FcmGateway`: Firebase Cloud Messaging HTTP v1 (default)
//! - `LogGateway`: dry-run gateway that logs envelopes, for local development
//!
//! Use [`create_gateway`] to build the configured implementation.

mod error;
mod fcm;
mod log;
mod models;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::GatewayConfig;
use crate::notification::MessageEnvelope;

pub use error::GatewayError;
pub use fcm::FcmGateway;
pub use log::LogGateway;
pub use models::ServiceAccountKey;

/// Result of one send inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendResponse {
    pub fn ok(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Result of a batch send. `responses` follows the input token order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl BatchResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

/// External push-delivery provider
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Send a topic- or token-addressed envelope; returns the message ID
    async fn send(&self, envelope: &MessageEnvelope) -> Result<String, GatewayError>;

    /// Send a multi-token envelope
    async fn send_batch(&self, envelope: &MessageEnvelope) -> Result<BatchResponse, GatewayError>;

    /// Backend identifier
    fn name(&self) -> &'static str;
}

/// Create the push gateway selected by configuration.
///
/// - `"log"`: returns a `LogGateway`
/// - `"fcm"` (default): loads the service account and returns an `FcmGateway`
pub fn create_gateway(config: &GatewayConfig) -> Result<Arc<dyn PushGateway>, GatewayError> {
    match config.backend.as_str() {
        "log" => {
            tracing::warn!(backend = "log", "Creating dry-run push gateway; nothing will be delivered");
            Ok(Arc::new(LogGateway::new()))
        }
        "fcm" => {
            let credentials = ServiceAccountKey::from_file(&config.service_account_path)?;
            let project_id = config
                .project_id
                .clone()
                .unwrap_or_else(|| credentials.project_id.clone());
            tracing::info!(backend = "fcm", project_id = %project_id, "Creating FCM push gateway");
            Ok(Arc::new(FcmGateway::new(
                project_id,
                credentials,
                config.endpoint.clone(),
            )?))
        }
        other => Err(GatewayError::Config(format!(
            "unknown gateway backend '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_response_counts() {
        let batch = BatchResponse::from_responses(vec![
            SendResponse::ok("m1"),
            SendResponse::failed("unregistered"),
            SendResponse::ok("m2"),
        ]);
        assert_eq!(batch.success_count, 2);
        assert_eq!(batch.failure_count, 1);
        assert_eq!(batch.responses[1].error.as_deref(), Some("unregistered"));
    }

    #[test]
    fn test_create_log_gateway() {
        let config = GatewayConfig {
            backend: "log".to_string(),
            ..GatewayConfig::default()
        };
        let gateway = create_gateway(&config).unwrap();
        assert_eq!(gateway.name(), "log");
    }

    #[test]
    fn test_create_unknown_gateway() {
        let config = GatewayConfig {
            backend: "carrier-pigeon".to_string(),
            ..GatewayConfig::default()
        };
        assert!(matches!(create_gateway(&config), Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_create_fcm_gateway_without_credentials() {
        let config = GatewayConfig {
            service_account_path: "/nonexistent/service-account.json".to_string(),
            ..GatewayConfig::default()
        };
        assert!(matches!(
            create_gateway(&config),
            Err(GatewayError::Credentials(_))
        ));
    }
}
