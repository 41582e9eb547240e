// Infrastructure (shared components)
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod auth;
pub mod gateway;
pub mod notification;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;

// Supporting modules
pub mod shutdown;
