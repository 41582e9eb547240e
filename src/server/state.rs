use std::sync::Arc;
use std::time::Instant;

use crate::auth::CredentialGate;
use crate::config::Settings;
use crate::gateway::PushGateway;
use crate::notification::{IntentRouter, NotificationDelivery};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub credential_gate: Arc<CredentialGate>,
    pub router: Arc<IntentRouter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(settings: Settings, gateway: Arc<dyn PushGateway>) -> Self {
        let credential_gate = Arc::new(CredentialGate::new(settings.api.key.clone()));
        let router = Arc::new(IntentRouter::new(NotificationDelivery::new(gateway)));

        Self {
            settings: Arc::new(settings),
            credential_gate,
            router,
            started_at: Instant::now(),
        }
    }
}
