mod api;
mod bootstrap;
mod health;

use std::time::Duration;

use anyhow::Result;
use deskmatch_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use deskmatch_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;

    let router = api::router(api::ApiState {
        provider: app.provider.clone(),
        matcher: app.matcher.clone(),
    })
    .merge(health::router(app.provider.clone()));

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "deskmatch-server listening"
    );

    let drain_limit = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal(drain_limit)).await?;

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "deskmatch-server stopped"
    );
    Ok(())
}

async fn shutdown_signal(drain_limit: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        drain_limit_secs = drain_limit.as_secs(),
        "shutdown signal received, draining connections"
    );
    // in-flight requests get the drain window, then the process exits
    tokio::spawn(async move {
        tokio::time::sleep(drain_limit).await;
        tracing::warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "drain window elapsed before connections closed, exiting"
        );
        std::process::exit(0);
    });
}
