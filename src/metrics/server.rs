//! HTTP server for the Prometheus metrics endpoint.

use crate::metrics::MetricsRegistry;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

/// Errors that can occur during metrics server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// HTTP server for exposing Prometheus metrics.
pub struct MetricsServer {
    bind_addr: SocketAddr,
    registry: Arc<MetricsRegistry>,
}

impl MetricsServer {
    /// Creates a server on all interfaces at `port`, over a clone of the
    /// frame loop's registry.
    pub fn new(port: u16, registry: MetricsRegistry) -> Self {
        Self {
            bind_addr: ([0, 0, 0, 0], port).into(),
            registry: Arc::new(registry),
        }
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(CorsLayer::permissive())
            .with_state(Arc::clone(&self.registry))
    }

    /// Starts the HTTP server.
    ///
    /// This method runs the server until it is shut down.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(self.bind_addr).await?;
        self.serve(listener).await
    }

    async fn serve(self, listener: tokio::net::TcpListener) -> Result<(), ServerError> {
        tracing::info!(addr = %self.bind_addr, "Metrics server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))
    }

    /// Binds the port, then serves from its own thread with a dedicated
    /// runtime so the synchronous frame loop is never blocked by it.
    ///
    /// Bind failures are returned here. Errors after that are logged
    /// from the server thread.
    pub fn spawn(self) -> Result<std::thread::JoinHandle<()>, ServerError> {
        let listener = std::net::TcpListener::bind(self.bind_addr)?;
        listener.set_nonblocking(true)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        Ok(std::thread::spawn(move || {
            let addr = self.bind_addr;
            let result = runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)?;
                self.serve(listener).await
            });
            if let Err(e) = result {
                tracing::error!(addr = %addr, "Metrics server stopped: {}", e);
            }
        }))
    }
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    match registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_all_interfaces() {
        let server = MetricsServer::new(8080, MetricsRegistry::new().unwrap());
        assert_eq!(server.bind_addr(), SocketAddr::from(([0, 0, 0, 0], 8080)));
    }

    #[test]
    fn test_spawn_reports_port_in_use() {
        let taken = std::net::TcpListener::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let server = MetricsServer::new(port, MetricsRegistry::new().unwrap());
        assert!(matches!(server.spawn(), Err(ServerError::Bind(_))));
    }
}
