mod settings;

pub use settings::{ApiConfig, GatewayConfig, OtelConfig, ServerConfig, Settings};
