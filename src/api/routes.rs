use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};
use crate::triggers::{
    admin_announcement, fortune_ready, promotion, test_notification, user_notification,
};

use super::health::{health, notifications_health, service_info};
use super::metrics::prometheus_metrics;

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Notification endpoints, API key required
        .nest(
            "/api/notifications",
            Router::new()
                .route("/health", get(notifications_health))
                .route("/admin", post(admin_announcement))
                .route("/promotion", post(promotion))
                .route("/fortune", post(fortune_ready))
                .route("/user", post(user_notification))
                .route("/test", post(test_notification))
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
}
