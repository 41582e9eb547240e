//! Service descriptor and health endpoints.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::API_KEY_HEADER;
use crate::server::AppState;

const SERVICE_NAME: &str = "Fal AI Notification Backend API";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDirectory {
    pub health: &'static str,
    pub api_health: &'static str,
    pub admin_announcement: &'static str,
    pub promotion: &'static str,
    pub fortune_ready: &'static str,
    pub user_notification: &'static str,
    pub test: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub success: bool,
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: EndpointDirectory,
    pub authentication: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: &'static str,
    pub environment: String,
    pub gateway: &'static str,
}

#[derive(Debug, Serialize)]
pub struct NotificationsHealthResponse {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// GET / - service descriptor
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        success: true,
        message: SERVICE_NAME,
        version: VERSION,
        endpoints: EndpointDirectory {
            health: "GET /health",
            api_health: "GET /api/notifications/health",
            admin_announcement: "POST /api/notifications/admin",
            promotion: "POST /api/notifications/promotion",
            fortune_ready: "POST /api/notifications/fortune",
            user_notification: "POST /api/notifications/user",
            test: "POST /api/notifications/test",
        },
        authentication: format!(
            "API Key required in {} header for protected routes",
            API_KEY_HEADER
        ),
    })
}

/// GET /health - liveness probe
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        message: "Fal AI Backend is running",
        timestamp: Utc::now(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        version: VERSION,
        environment: state.settings.run_mode.clone(),
        gateway: state.router.delivery().gateway_name(),
    })
}

/// GET /api/notifications/health - authenticated health check
pub async fn notifications_health() -> Json<NotificationsHealthResponse> {
    Json(NotificationsHealthResponse {
        success: true,
        message: "Notification service is healthy",
        timestamp: Utc::now(),
        version: VERSION,
    })
}
