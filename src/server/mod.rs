//! HTTP surface for the rate API.
//!
//! Routes are served both at the root and under `/api/exchangerate`.

pub mod handlers;
pub mod openapi;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::config::ServerConfig;
use crate::service::ExchangeRateService;

pub struct Server {
    config: ServerConfig,
    service: Arc<ExchangeRateService>,
}

impl Server {
    pub fn new(config: ServerConfig, service: Arc<ExchangeRateService>) -> Self {
        Self { config, service }
    }

    /// Build the router with tracing and permissive CORS.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router(Arc::clone(&self.service))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Bind the configured address. Hostnames such as `localhost` are resolved.
    pub async fn bind(&self) -> Result<TcpListener> {
        let (host, port) = (self.config.host.as_str(), self.config.port);
        TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind {host}:{port}"))
    }

    pub async fn start(&self) -> Result<()> {
        let listener = self.bind().await?;
        let addr = listener.local_addr()?;
        info!("ECB rates API listening on http://{}", addr);

        axum::serve(listener, self.router())
            .await
            .context("Server terminated unexpectedly")
    }
}
