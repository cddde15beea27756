//! codepadd — Codepad admission/session daemon.
//!
//! Standalone process that connects to the shared store and runs the
//! inactivity reaper. Gateway processes embedding [`codepad::CollabEngine`]
//! can disable their in-process reaper and let one codepadd instance own
//! the sweeps.

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use codepad::{AppConfig, AppError, CollabEngine};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CODEPAD_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting codepadd v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(provider = %config.store.provider, "Connecting to store...");
    let engine = CollabEngine::new(config).await?;

    if !engine.health_check().await? {
        return Err(AppError::internal("Store health check failed"));
    }
    tracing::info!("Store connection healthy");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reaper_handle = if engine.config().reaper.enabled {
        let reaper = engine.reaper().clone();
        let cancel = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            reaper.run(cancel).await;
        });
        Some(handle)
    } else {
        tracing::info!("Reaper disabled, nothing to do but wait for shutdown");
        None
    };

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    if let Some(handle) = reaper_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    tracing::info!("codepadd shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
