use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tokio::sync::RwLock;

use crate::metrics::GatewayMetrics;
use crate::notification::{MessageEnvelope, Target};

use super::models::{
    FcmApiResponse, FcmErrorEnvelope, FcmMessage, GoogleTokenResponse, JwtClaims,
    ServiceAccountKey, TokenCache,
};
use super::{BatchResponse, GatewayError, PushGateway, SendResponse};

const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Refresh cached access tokens this many seconds before they expire
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Timeout for a single HTTP call to Google
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Firebase Cloud Messaging HTTP v1 gateway.
///
/// Authenticates with a service account: a signed JWT assertion is exchanged
/// for an OAuth2 access token, which is cached until shortly before expiry.
pub struct FcmGateway {
    project_id: String,
    credentials: ServiceAccountKey,
    endpoint: String,
    token_cache: RwLock<Option<TokenCache>>,
    http_client: reqwest::Client,
}

impl FcmGateway {
    pub fn new(
        project_id: String,
        credentials: ServiceAccountKey,
        endpoint: String,
    ) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            project_id,
            credentials,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token_cache: RwLock::new(None),
            http_client,
        })
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.project_id
        )
    }

    /// Get an access token, reusing the cached one while it is fresh
    async fn access_token(&self) -> Result<String, GatewayError> {
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.expires_at > Utc::now().timestamp() + TOKEN_REFRESH_MARGIN_SECS {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: MESSAGING_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| GatewayError::Token(format!("invalid private key: {}", e)))?;
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.credentials.private_key_id.clone()).filter(|k| !k.is_empty());
        let assertion = encode(&header, &claims, &encoding_key)
            .map_err(|e| GatewayError::Token(format!("failed to sign assertion: {}", e)))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| GatewayError::Token(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Token(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let token: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Token(format!("invalid token response: {}", e)))?;

        let mut cache = self.token_cache.write().await;
        *cache = Some(TokenCache {
            access_token: token.access_token.clone(),
            expires_at: Utc::now().timestamp() + token.expires_in,
        });

        tracing::debug!(expires_in = token.expires_in, "Refreshed FCM access token");

        Ok(token.access_token)
    }

    /// POST one message and return the provider message name
    async fn post_message(
        &self,
        access_token: &str,
        message: &FcmMessage,
    ) -> Result<String, GatewayError> {
        let response = self
            .http_client
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: FcmApiResponse = response
                .json()
                .await
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
            return body
                .name
                .ok_or_else(|| GatewayError::InvalidResponse("missing message name".to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<FcmErrorEnvelope>(&text) {
            Ok(envelope) => match (envelope.error.status, envelope.error.message) {
                (Some(code), Some(msg)) => format!("{}: {}", code, msg),
                (None, Some(msg)) => msg,
                (Some(code), None) => code,
                (None, None) => text,
            },
            Err(_) => text,
        };

        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PushGateway for FcmGateway {
    async fn send(&self, envelope: &MessageEnvelope) -> Result<String, GatewayError> {
        if let Target::Tokens(_) = envelope.target() {
            return Err(GatewayError::UnsupportedTarget {
                operation: "send",
                reason: "multi-token envelopes must use send_batch".to_string(),
            });
        }

        let _timer = GatewayMetrics::start_timer("send");
        let access_token = self.access_token().await?;
        let message = FcmMessage::from_envelope(envelope, None);
        self.post_message(&access_token, &message).await
    }

    async fn send_batch(&self, envelope: &MessageEnvelope) -> Result<BatchResponse, GatewayError> {
        let Target::Tokens(tokens) = envelope.target() else {
            return Err(GatewayError::UnsupportedTarget {
                operation: "send_batch",
                reason: "batch sends require a multi-token envelope".to_string(),
            });
        };

        let _timer = GatewayMetrics::start_timer("send_batch");
        let access_token = self.access_token().await?;

        // FCM v1 has no multicast endpoint; send one request per token
        let sends = tokens.iter().map(|token| {
            let message = FcmMessage::from_envelope(envelope, Some(token));
            let access_token = access_token.as_str();
            async move {
                match self.post_message(access_token, &message).await {
                    Ok(name) => SendResponse::ok(name),
                    Err(e) => SendResponse::failed(e.to_string()),
                }
            }
        });

        Ok(BatchResponse::from_responses(join_all(sends).await))
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}
