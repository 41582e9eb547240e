use axum::{
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde::Serialize;

pub const AVAILABLE_ENDPOINTS: [&str; 8] = [
    "GET /",
    "GET /health",
    "GET /api/notifications/health",
    "POST /api/notifications/admin",
    "POST /api/notifications/promotion",
    "POST /api/notifications/fortune",
    "POST /api/notifications/user",
    "POST /api/notifications/test",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    pub available_endpoints: &'static [&'static str],
}

/// Fallback for unknown routes and unsupported methods
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::debug!(method = %method, uri = %uri, "Unknown endpoint");

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            error: "Endpoint not found",
            message: format!("The endpoint {} {} does not exist", method, uri),
            available_endpoints: &AVAILABLE_ENDPOINTS,
        }),
    )
}
