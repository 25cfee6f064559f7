//! The LDN inbox server.

use std::net::SocketAddr;

use axum::http::header;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::InboxConfig;
use crate::error::{Error, Result};
use crate::rest;
use crate::state::AppState;

/// The LDN inbox server.
///
/// Owns the configuration and shared state, builds the router and runs it.
pub struct InboxServer {
    config: InboxConfig,
    state: AppState,
}

impl InboxServer {
    /// Creates a server, opening the storage backend named by `config`.
    pub fn new(config: InboxConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Creates a server around a pre-built `AppState`.
    pub fn with_state(config: InboxConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Returns a reference to the shared `AppState`.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the `axum` router with its middleware.
    pub fn build_router(&self) -> Router {
        let app = rest::router(&self.config.inbox_path).with_state(self.state.clone());

        let app = if self.config.cors_enabled {
            app.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
                    .expose_headers([
                        header::LOCATION,
                        header::LINK,
                        header::ALLOW,
                        header::HeaderName::from_static("accept-post"),
                    ]),
            )
        } else {
            app
        };

        if self.config.tracing {
            app.layer(TraceLayer::new_for_http())
        } else {
            app
        }
    }

    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))
    }

    /// Runs the server indefinitely.
    pub async fn run(self) -> Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server until `shutdown_signal` completes.
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = self.build_router();

        info!("Starting LDN inbox server on http://{}", addr);
        info!("Inbox: {}", self.state.engine.inbox().iri());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        info!("LDN inbox server stopped");
        Ok(())
    }
}
