//! HTTP server for wayfinder
//!
//! Provides REST API endpoints for geocoding, place search and routing.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::provider::MapProvider;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server on the configured address
///
/// Never returns unless the server shuts down
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server with a specific address
///
/// Useful when the CLI overrides host or port
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::from_config(config)?);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    serve(listener, state).await
}

/// Serve the API on an already-bound listener
pub async fn serve<P: MapProvider>(listener: TcpListener, state: Arc<AppState<P>>) -> Result<()> {
    let provider = state.service().provider_name();
    let app = create_router(state);

    if let Ok(addr) = listener.local_addr() {
        info!(provider, "Starting server on {}", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
