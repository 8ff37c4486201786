mod bootstrap;
mod chat;
mod health;

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use dinebot_core::config::{AppConfig, LoadOptions};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::Application;

fn init_logging(config: &AppConfig) {
    use dinebot_core::config::LogFormat::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_env_filter(filter).json().init();
        }
    }
}

fn routes(app: &Application) -> Router {
    chat::router(app.agent_runtime.clone()).merge(health::router(app.agent_runtime.model_ready()))
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging reads its level and format from the same config the app uses.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "dinebot-server listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(
                event_name = "system.server.signal_error",
                correlation_id = "shutdown",
                error = %error,
                "failed to listen for shutdown signal"
            );
        }
        let _ = signalled_tx.send(());
        tracing::info!(
            event_name = "system.server.stopping",
            correlation_id = "shutdown",
            grace_secs = grace.as_secs(),
            "draining in-flight requests"
        );
    };

    let server = axum::serve(listener, routes(&app)).with_graceful_shutdown(shutdown).into_future();
    let grace_expired = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result?,
        _ = grace_expired => {
            tracing::warn!(
                event_name = "system.server.grace_expired",
                correlation_id = "shutdown",
                "graceful shutdown window elapsed; dropping open connections"
            );
        }
    }

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "dinebot-server stopped"
    );
    Ok(())
}
