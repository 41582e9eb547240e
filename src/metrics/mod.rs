//! Prometheus metrics for the notification service.
//!
//! - Notification metrics (dispatched by kind and outcome)
//! - Gateway metrics (sends by target shape, call latency)
//! - Request gate metrics (auth rejections, validation failures)

mod helpers;

pub use helpers::{encode_metrics, AuthMetrics, GatewayMetrics, NotificationMetrics, ValidationMetrics};

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "fal_notification";

lazy_static! {
    /// Notifications handled, by kind and outcome
    pub static ref NOTIFICATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_notifications_total", METRIC_PREFIX),
        "Total notifications dispatched",
        &["kind", "outcome"]
    ).unwrap();

    /// Gateway sends, by target shape and outcome
    pub static ref GATEWAY_SENDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_gateway_sends_total", METRIC_PREFIX),
        "Total push gateway calls",
        &["target", "outcome"]
    ).unwrap();

    /// Gateway call latency, by operation
    pub static ref GATEWAY_LATENCY: HistogramVec = register_histogram_vec!(
        format!("{}_gateway_latency_seconds", METRIC_PREFIX),
        "Push gateway call latency in seconds",
        &["operation"],
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Requests rejected by the credential gate
    pub static ref AUTH_REJECTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_auth_rejections_total", METRIC_PREFIX),
        "Total requests rejected by API key authentication",
        &["reason"]
    ).unwrap();

    /// Requests rejected by payload validation
    pub static ref VALIDATION_FAILURES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_validation_failures_total", METRIC_PREFIX),
        "Total requests rejected by payload validation",
        &["field"]
    ).unwrap();
}
