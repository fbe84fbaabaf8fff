//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the summary route
//! - Wire up middleware (timeout, request ID, tracing, CORS)
//! - Own the shared state (upstream client, summary cache)
//! - Serve with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::cache::SummaryCache;
use crate::config::ProxyConfig;
use crate::http::summary::{preflight, wallet_summary};
use crate::upstream::WalletApiClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<WalletApiClient>,
    pub cache: SummaryCache,
    pub cache_enabled: bool,
}

/// HTTP server for the wallet summary proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = Arc::new(WalletApiClient::new(&config.upstream, &config.retries));
        let cache = SummaryCache::new(Duration::from_secs(config.cache.ttl_secs));

        let state = AppState {
            upstream,
            cache,
            cache_enabled: config.cache.enabled,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        // The original handler answers every caller with permissive CORS
        // headers; preflights additionally get methods and headers.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route(
                "/api/wallet-summary",
                get(wallet_summary).options(preflight),
            )
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(cors),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
