use std::sync::Arc;

use chrono::Utc;

use crate::gateway::PushGateway;
use crate::metrics::GatewayMetrics;

use super::{redact_token, DeliveryResult, MessageEnvelope, PushNotification, RecipientOutcome, Target};

/// Addresses notifications, hands them to the push gateway and normalizes
/// the outcome into a [`DeliveryResult`].
///
/// Each call builds one envelope and makes exactly one gateway call. Gateway
/// errors are reported as `DeliveryResult::Failure`; nothing is retried.
#[derive(Clone)]
pub struct NotificationDelivery {
    gateway: Arc<dyn PushGateway>,
}

impl NotificationDelivery {
    pub fn new(gateway: Arc<dyn PushGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway_name(&self) -> &'static str {
        self.gateway.name()
    }

    /// Deliver to whichever addressing mode `target` names
    pub async fn deliver(&self, target: Target, notification: &PushNotification) -> DeliveryResult {
        match target {
            Target::Topic(topic) => self.deliver_to_topic(&topic, notification).await,
            Target::Token(token) => self.deliver_to_token(&token, notification).await,
            Target::Tokens(tokens) => self.deliver_to_tokens(&tokens, notification).await,
        }
    }

    fn envelope(target: Target, notification: &PushNotification) -> MessageEnvelope {
        MessageEnvelope::new(target, notification, Utc::now().timestamp_millis())
    }

    /// Send to every device subscribed to `topic`
    #[tracing::instrument(name = "delivery.topic", skip(self, notification))]
    pub async fn deliver_to_topic(&self, topic: &str, notification: &PushNotification) -> DeliveryResult {
        let envelope = Self::envelope(Target::Topic(topic.to_string()), notification);

        match self.gateway.send(&envelope).await {
            Ok(message_id) => {
                GatewayMetrics::record_outcome("topic", true);
                tracing::info!(message_id = %message_id, "Topic message sent");
                DeliveryResult::Success {
                    message_id,
                    target: topic.to_string(),
                }
            }
            Err(e) => {
                GatewayMetrics::record_outcome("topic", false);
                tracing::error!(error = %e, "Topic message failed");
                DeliveryResult::Failure {
                    error_message: e.to_string(),
                }
            }
        }
    }

    /// Send to a single device
    #[tracing::instrument(
        name = "delivery.token",
        skip(self, token, notification),
        fields(token = %redact_token(token))
    )]
    pub async fn deliver_to_token(&self, token: &str, notification: &PushNotification) -> DeliveryResult {
        let envelope = Self::envelope(Target::Token(token.to_string()), notification);

        match self.gateway.send(&envelope).await {
            Ok(message_id) => {
                GatewayMetrics::record_outcome("token", true);
                tracing::info!(message_id = %message_id, "Token message sent");
                DeliveryResult::Success {
                    message_id,
                    target: redact_token(token),
                }
            }
            Err(e) => {
                GatewayMetrics::record_outcome("token", false);
                tracing::error!(error = %e, "Token message failed");
                DeliveryResult::Failure {
                    error_message: e.to_string(),
                }
            }
        }
    }

    /// Send to several devices in one batch.
    ///
    /// Per-recipient failures are reported in `PartialSuccess`; only a batch
    /// that fails outright yields `Failure`.
    #[tracing::instrument(
        name = "delivery.tokens",
        skip(self, tokens, notification),
        fields(token_count = tokens.len())
    )]
    pub async fn deliver_to_tokens(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> DeliveryResult {
        let envelope = Self::envelope(Target::Tokens(tokens.to_vec()), notification);

        match self.gateway.send_batch(&envelope).await {
            Ok(batch) => {
                GatewayMetrics::record_outcome("tokens", batch.failure_count == 0);
                tracing::info!(
                    success_count = batch.success_count,
                    failure_count = batch.failure_count,
                    "Multicast sent"
                );

                let outcomes = tokens
                    .iter()
                    .zip(batch.responses)
                    .map(|(token, response)| RecipientOutcome {
                        token: redact_token(token),
                        success: response.success,
                        message_id: response.message_id,
                        error: response.error,
                    })
                    .collect();

                DeliveryResult::PartialSuccess {
                    success_count: batch.success_count,
                    failure_count: batch.failure_count,
                    outcomes,
                }
            }
            Err(e) => {
                GatewayMetrics::record_outcome("tokens", false);
                tracing::error!(error = %e, "Multicast failed");
                DeliveryResult::Failure {
                    error_message: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{BatchResponse, GatewayError, SendResponse};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records envelopes; fails every call when `fail` is set
    #[derive(Default)]
    struct RecordingGateway {
        fail: bool,
        sent: Mutex<Vec<MessageEnvelope>>,
    }

    #[async_trait]
    impl PushGateway for RecordingGateway {
        async fn send(&self, envelope: &MessageEnvelope) -> Result<String, GatewayError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(envelope.clone());
            if self.fail {
                return Err(GatewayError::Api {
                    status: 404,
                    message: "NOT_FOUND: Requested entity was not found.".to_string(),
                });
            }
            Ok(format!("projects/p/messages/{}", sent.len()))
        }

        async fn send_batch(&self, envelope: &MessageEnvelope) -> Result<BatchResponse, GatewayError> {
            self.sent.lock().unwrap().push(envelope.clone());
            if self.fail {
                return Err(GatewayError::InvalidResponse("batch rejected".to_string()));
            }
            let Target::Tokens(tokens) = envelope.target() else {
                unreachable!("batch sends use multi-token envelopes");
            };
            Ok(BatchResponse::from_responses(
                tokens
                    .iter()
                    .map(|t| {
                        if t.starts_with("bad") {
                            SendResponse::failed("UNREGISTERED")
                        } else {
                            SendResponse::ok(format!("msg-{}", t))
                        }
                    })
                    .collect(),
            ))
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn notification() -> PushNotification {
        PushNotification {
            title: "Title".to_string(),
            body: "Body".to_string(),
            image_url: None,
            metadata: BTreeMap::from([("type".to_string(), "test".to_string())]),
            click_action: "FLUTTER_NOTIFICATION_CLICK".to_string(),
            extra_data: BTreeMap::new(),
        }
    }

    fn delivery(fail: bool) -> (NotificationDelivery, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway {
            fail,
            ..Default::default()
        });
        (NotificationDelivery::new(gateway.clone()), gateway)
    }

    #[tokio::test]
    async fn test_deliver_to_topic() {
        let (delivery, gateway) = delivery(false);
        let result = delivery.deliver_to_topic("all_users", &notification()).await;

        assert_eq!(
            result,
            DeliveryResult::Success {
                message_id: "projects/p/messages/1".to_string(),
                target: "all_users".to_string(),
            }
        );

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].target(), &Target::Topic("all_users".to_string()));
        assert!(sent[0].data().contains_key("timestamp"));
        assert_eq!(sent[0].data()["click_action"], "FLUTTER_NOTIFICATION_CLICK");
    }

    #[tokio::test]
    async fn test_deliver_to_token_redacts_descriptor() {
        let (delivery, _) = delivery(false);
        let token = "f".repeat(152);
        let result = delivery.deliver_to_token(&token, &notification()).await;

        match result {
            DeliveryResult::Success { target, .. } => {
                assert_eq!(target, format!("{}...", "f".repeat(20)));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gateway_error_becomes_failure() {
        let (delivery, gateway) = delivery(true);
        let result = delivery.deliver_to_token("token-1", &notification()).await;

        match result {
            DeliveryResult::Failure { error_message } => {
                assert!(error_message.contains("Requested entity was not found"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // No retry
        assert_eq!(gateway.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deliver_to_tokens_partial() {
        let (delivery, _) = delivery(false);
        let tokens = vec!["good-1".to_string(), "bad-2".to_string(), "good-3".to_string()];
        let result = delivery.deliver_to_tokens(&tokens, &notification()).await;

        match result {
            DeliveryResult::PartialSuccess {
                success_count,
                failure_count,
                outcomes,
            } => {
                assert_eq!(success_count, 2);
                assert_eq!(failure_count, 1);
                assert_eq!(outcomes.len(), 3);
                assert!(!outcomes[1].success);
                assert_eq!(outcomes[1].token, "bad-2...");
                assert_eq!(outcomes[1].error.as_deref(), Some("UNREGISTERED"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deliver_to_tokens_outright_failure() {
        let (delivery, _) = delivery(true);
        let result = delivery
            .deliver_to_tokens(&["a".to_string()], &notification())
            .await;
        assert!(matches!(result, DeliveryResult::Failure { .. }));
    }

    #[tokio::test]
    async fn test_each_send_is_stamped_separately() {
        let (delivery, gateway) = delivery(false);
        let first = delivery.deliver(Target::Topic("t".into()), &notification()).await;
        let second = delivery.deliver(Target::Topic("t".into()), &notification()).await;

        assert_ne!(first, second);
        assert_eq!(gateway.sent.lock().unwrap().len(), 2);
    }
}
