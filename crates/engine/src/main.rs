//! Whackbet Engine - Main entry point.

use tokio::sync::{broadcast, watch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use whackbet_domain::DomainEvent;
use whackbet_engine::infrastructure::settings::EngineSettings;
use whackbet_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whackbet_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Whackbet Engine");

    // Load configuration
    let settings = EngineSettings::from_env()?;
    tracing::info!(
        field_size = settings.field_size,
        max_players = settings.max_players,
        relocation_interval_ms = settings.relocation_interval.as_millis() as u64,
        event_channel_capacity = settings.event_channel_capacity,
        "Settings loaded"
    );

    let app = App::in_memory(settings);

    // Background workers
    let reactor_task = tokio::spawn(app.reactor().run(app.event_bus.subscribe()));
    let event_log_task = tokio::spawn(log_events(app.event_bus.subscribe()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker_task = tokio::spawn(app.relocation_ticker().run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    shutdown_tx.send(true)?;
    ticker_task.await?;

    // Use cases keep the bus alive, so the subscribers never see it close.
    reactor_task.abort();
    event_log_task.abort();

    tracing::info!("Whackbet Engine stopped");
    Ok(())
}

/// Write every published event to the log as JSON.
async fn log_events(mut receiver: broadcast::Receiver<DomainEvent>) {
    loop {
        match receiver.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => tracing::info!(target: "whackbet_engine::events", "{json}"),
                Err(e) => tracing::warn!(error = %e, "Failed to encode event"),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event log lagged behind the bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
