use anyhow::Result;
use tokio::net::TcpListener;

use fal_notification_service::config::Settings;
use fal_notification_service::gateway::create_gateway;
use fal_notification_service::server::{create_app, AppState};
use fal_notification_service::shutdown::shutdown_signal;
use fal_notification_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing; the guard flushes spans on exit
    let _telemetry = init_telemetry(&settings.otel)?;
    tracing::info!("Configuration loaded");

    // Push gateway
    let gateway = create_gateway(&settings.gateway)?;
    tracing::info!(gateway = gateway.name(), "Push gateway initialized");

    // Create application state
    let state = AppState::new(settings.clone(), gateway);
    let api_key_configured = state.credential_gate.is_configured();
    if !api_key_configured {
        tracing::warn!("API_KEY is not set; every notification request will be rejected");
    }
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(
        environment = %settings.run_mode,
        address = %addr,
        api_key = if api_key_configured { "configured" } else { "missing" },
        "Fal AI Notification Backend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
