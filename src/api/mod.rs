mod fallback;
mod health;
mod metrics;
mod routes;

pub use fallback::{not_found, NotFoundResponse, AVAILABLE_ENDPOINTS};
pub use health::{health, notifications_health, service_info};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
