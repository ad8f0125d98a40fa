//! HTTP server
//!
//! Wires the relays behind an axum router and runs it until Ctrl+C or
//! SIGTERM.

mod error;
mod handlers;
mod router;
mod state;

pub use router::create_router;
pub use state::AppState;

use crate::config::Config;
use crate::provider::create_provider;
use anyhow::Context;
use tokio::net::TcpListener;

/// Build the provider and router from `config` and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let provider = create_provider(&config)?;
    let state = AppState::new(&config, provider);
    let app = create_router(state, &config.server);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Voice relay listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
