// Main entry point - Dependency injection and session lifecycle
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use crate::application::telemetry_store::TelemetryStore;
use crate::infrastructure::config::load_settings;
use crate::infrastructure::mqtt_transport::MqttTransport;
use crate::presentation::console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let settings = load_settings()?;

    // Create the store (application layer)
    let (store, command_rx) = TelemetryStore::new(settings.history.capacity);
    let store = Arc::new(store);

    // Open the broker session (infrastructure layer)
    let transport = MqttTransport::connect(&settings.broker);
    let client = transport.handle();

    println!(
        "Starting esp32-telemetry dashboard against {}:{}",
        settings.broker.host, settings.broker.port
    );

    let session = tokio::spawn(transport.run(store.clone(), command_rx));
    let display = tokio::spawn(console::run(store.clone(), settings.console));

    // Run until interrupted; the console owns its own refresh cadence
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");

    // Stop accepting telemetry, then close the broker session cleanly
    store.shutdown();
    let _ = client.disconnect().await;
    let _ = tokio::time::timeout(Duration::from_secs(2), session).await;
    display.abort();

    Ok(())
}
