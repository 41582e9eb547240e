//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, HistogramTimer, TextEncoder};

use super::{
    AUTH_REJECTIONS_TOTAL, GATEWAY_LATENCY, GATEWAY_SENDS_TOTAL, NOTIFICATIONS_TOTAL,
    VALIDATION_FAILURES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording notification metrics
pub struct NotificationMetrics;

impl NotificationMetrics {
    /// Record a dispatched notification
    pub fn record(kind: &str, outcome: &str) {
        NOTIFICATIONS_TOTAL.with_label_values(&[kind, outcome]).inc();
    }
}

/// Helper struct for recording push gateway metrics
pub struct GatewayMetrics;

impl GatewayMetrics {
    /// Record a gateway call for a target shape ("topic", "token", "tokens")
    pub fn record_outcome(target: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        GATEWAY_SENDS_TOTAL.with_label_values(&[target, outcome]).inc();
    }

    /// Start a latency timer; the observation is recorded on drop
    pub fn start_timer(operation: &str) -> HistogramTimer {
        GATEWAY_LATENCY.with_label_values(&[operation]).start_timer()
    }
}

/// Helper struct for recording credential gate metrics
pub struct AuthMetrics;

impl AuthMetrics {
    pub fn record_missing() {
        AUTH_REJECTIONS_TOTAL.with_label_values(&["missing"]).inc();
    }

    pub fn record_invalid() {
        AUTH_REJECTIONS_TOTAL.with_label_values(&["invalid"]).inc();
    }
}

/// Helper struct for recording validation metrics
pub struct ValidationMetrics;

impl ValidationMetrics {
    pub fn record_failure(field: &str) {
        VALIDATION_FAILURES_TOTAL.with_label_values(&[field]).inc();
    }
}
