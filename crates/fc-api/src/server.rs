//! API server setup

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use fc_config::ServerConfig;

use crate::routes::create_router;
use crate::state::AppState;

/// Build the router and resolve the listen address.
///
/// # Errors
///
/// Returns an error if host and port do not form a socket address.
pub fn create_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(Router, SocketAddr), std::net::AddrParseError> {
    let router = create_router(state, config.enable_cors);
    let addr: SocketAddr = config.bind_addr().parse()?;
    Ok((router, addr))
}

/// Serve until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound, or
/// the server fails.
pub async fn run_server(
    config: &ServerConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, state)?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "fleetcheck API listening");
    axum::serve(listener, router).await?;
    Ok(())
}
