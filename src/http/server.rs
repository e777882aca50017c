//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Graceful shutdown on ctrl-c

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::claim::ClaimService;
use crate::config::VoucherConfig;
use crate::http::handlers;
use crate::profile::ProfileResolver;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<ClaimService>,
    pub resolver: Arc<dyn ProfileResolver>,
}

/// HTTP server for the voucher service.
pub struct HttpServer {
    router: Router,
    config: VoucherConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and
    /// collaborators.
    pub fn new(
        config: VoucherConfig,
        claims: Arc<ClaimService>,
        resolver: Arc<dyn ProfileResolver>,
    ) -> Self {
        let state = AppState { claims, resolver };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &VoucherConfig, state: AppState) -> Router {
        Router::new()
            .route("/profile-image", get(handlers::get_profile_image))
            .route("/signed-voucher", get(handlers::get_signed_voucher))
            .route("/health", get(handlers::get_health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &VoucherConfig {
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
