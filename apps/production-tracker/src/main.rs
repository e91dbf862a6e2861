//! Production Tracker Binary
//!
//! Starts the production tracker HTTP API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin production-tracker
//! ```
//!
//! # Environment Variables
//!
//! - `TRACKER_CONFIG`: Path to the YAML config (default: config.yaml; built-in
//!   defaults when the file is absent)
//! - `RUST_LOG`: Overrides the configured log filter

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use production_tracker::config::{CONFIG_PATH_ENV, Config, load_config};
use production_tracker::infrastructure::config::Container;
use production_tracker::infrastructure::http::create_router;
use production_tracker::observability::{MetricsConfig, init_metrics, init_tracing};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config = read_config()?;
    init_tracing(&config.observability.logging).context("failed to initialise logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        currency = %config.business.currency,
        "Starting production tracker"
    );

    if config.observability.metrics.enabled {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics.port));
        init_metrics(&MetricsConfig::with_addr(addr)).context("failed to start metrics")?;
    }

    let rules = config
        .business
        .to_rules()
        .context("invalid business configuration")?;
    let container = Container::in_memory(rules);
    let app = create_router(container.app_state());

    let addr = config
        .server
        .socket_addr()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Production tracker stopped");
    Ok(())
}

/// Load the config file; fall back to defaults when no path was given and
/// `config.yaml` is absent.
fn read_config() -> anyhow::Result<Config> {
    let explicit = std::env::var(CONFIG_PATH_ENV).ok();
    if explicit.is_none() && !Path::new("config.yaml").exists() {
        return Ok(Config::default());
    }
    load_config(explicit.as_deref()).context("failed to load configuration")
}

fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    tracing::info!("Graceful shutdown started");
}
