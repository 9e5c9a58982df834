//! # Channel Relay
//!
//! Entry point: initializes logging, loads configuration and serves the
//! HTTP/WebSocket relay until a shutdown signal arrives.

use anyhow::Result;
use tracing::info;

use channel_relay::config::Settings;
use channel_relay::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    channel_relay::telemetry::init_tracing();

    info!("Starting Channel Relay...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        channels = settings.channels.len(),
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!(addr = %application.local_addr()?, "Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
