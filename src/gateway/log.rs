use async_trait::async_trait;
use uuid::Uuid;

use crate::notification::{redact_token, MessageEnvelope, Target};

use super::{BatchResponse, GatewayError, PushGateway, SendResponse};

/// Dry-run gateway: logs each envelope and answers with a synthetic message ID
#[derive(Debug, Default)]
pub struct LogGateway;

impl LogGateway {
    pub fn new() -> Self {
        Self
    }

    fn message_id() -> String {
        format!("dry-run/messages/{}", Uuid::new_v4())
    }
}

#[async_trait]
impl PushGateway for LogGateway {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<String, GatewayError> {
        if let Target::Tokens(_) = envelope.target() {
            return Err(GatewayError::UnsupportedTarget {
                operation: "send",
                reason: "multi-token envelopes must use send_batch".to_string(),
            });
        }

        let message_id = Self::message_id();
        tracing::info!(
            target_descriptor = %envelope.target().descriptor(),
            title = %envelope.notification().title,
            data_keys = ?envelope.data().keys().collect::<Vec<_>>(),
            message_id = %message_id,
            "Dry-run push send"
        );
        Ok(message_id)
    }

    async fn send_batch(&self, envelope: &MessageEnvelope) -> Result<BatchResponse, GatewayError> {
        let Target::Tokens(tokens) = envelope.target() else {
            return Err(GatewayError::UnsupportedTarget {
                operation: "send_batch",
                reason: "batch sends require a multi-token envelope".to_string(),
            });
        };

        let responses = tokens
            .iter()
            .map(|token| {
                tracing::info!(token = %redact_token(token), "Dry-run push send");
                SendResponse::ok(Self::message_id())
            })
            .collect();

        Ok(BatchResponse::from_responses(responses))
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::PushNotification;
    use std::collections::BTreeMap;

    fn envelope(target: Target) -> MessageEnvelope {
        let notification = PushNotification {
            title: "T".to_string(),
            body: "B".to_string(),
            image_url: None,
            metadata: BTreeMap::new(),
            click_action: "FLUTTER_NOTIFICATION_CLICK".to_string(),
            extra_data: BTreeMap::new(),
        };
        MessageEnvelope::new(target, &notification, 0)
    }

    #[test]
    fn test_send_returns_distinct_ids() {
        let gateway = LogGateway::new();
        let envelope = envelope(Target::Topic("all_users".into()));

        let first = tokio_test::block_on(gateway.send(&envelope)).unwrap();
        let second = tokio_test::block_on(gateway.send(&envelope)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_send_batch() {
        let gateway = LogGateway::new();
        let envelope = envelope(Target::Tokens(vec!["a".into(), "b".into(), "c".into()]));

        let batch = tokio_test::block_on(gateway.send_batch(&envelope)).unwrap();
        assert_eq!(batch.success_count, 3);
        assert_eq!(batch.failure_count, 0);
    }
}
