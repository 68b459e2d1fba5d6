//! HTTP server that serves a dispatch table on a TCP socket.

use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::dispatch::DispatchTable;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Owns the router built from a dispatch table and runs it
pub struct Server {
    addr: SocketAddr,
    router: Router,
}

impl Server {
    pub fn new(addr: SocketAddr, table: DispatchTable) -> Self {
        Self {
            addr,
            router: app(table),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: self.addr,
                source,
            })?;

        serve(listener, self.router, shutdown_signal()).await
    }
}

/// Router for a dispatch table, wrapped in request tracing
pub fn app(table: DispatchTable) -> Router {
    table.into_router().layer(TraceLayer::new_for_http())
}

/// Serve `router` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), ServerError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(address = %local_addr, "Listening for connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
