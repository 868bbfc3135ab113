//! Application server
//!
//! Binds the listener and serves the router until SIGINT or SIGTERM.

use crate::{
    config::Settings,
    server::{routes, state::AppState},
};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::signal;

/// Main application struct
pub struct App {
    state: AppState,
}

impl App {
    /// Create a new application instance
    ///
    /// Provider clients are built per request from the credentials present
    /// at that moment, so nothing here touches the network.
    pub fn new(settings: Settings) -> Self {
        tracing::debug!("Initializing application state");
        Self {
            state: AppState::new(settings),
        }
    }

    /// Run the server with graceful shutdown support
    pub async fn run_with_graceful_shutdown(self) -> Result<()> {
        let server_addr = self.state.settings.server_addr();
        let addr = server_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server address {}", server_addr))?;
        let router = routes::create_router(self.state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        tracing::info!(address = %addr, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }
}

/// Completes when SIGINT (Ctrl+C) or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
