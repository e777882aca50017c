//! Eligibility-Gated Mint Voucher Service
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌─────────────────────────────────────────────────┐
//!                        │                VOUCHER SERVICE                   │
//!                        │                                                  │
//!   GET /signed-voucher  │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│  claim   │───▶│   chain    │──┼──▶ JSON-RPC
//!                        │  │ server  │    │ pipeline │    │  (gates)   │  │
//!                        │  └─────────┘    └────┬─────┘    └────────────┘  │
//!                        │                      │                          │
//!                        │                      ▼                          │
//!                        │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!                        │  │ profile │───▶│ artwork  │───▶│  storage   │──┼──▶ CAS gateway
//!                        │  │ resolve │    │ compose  │    │  publish   │  │
//!                        │  └─────────┘    └──────────┘    └─────┬──────┘  │
//!                        │                                       │         │
//!   {voucher, signature} │                 ┌──────────┐          │         │
//!   ◀────────────────────┼─────────────────│ voucher  │◀─────────┘         │
//!                        │                 │  issuer  │                    │
//!                        │                 └──────────┘                    │
//!                        │                                                 │
//!                        │  ┌───────────────────────────────────────────┐  │
//!                        │  │        Cross-Cutting Concerns             │  │
//!                        │  │  ┌────────┐ ┌─────────────┐ ┌──────────┐  │  │
//!                        │  │  │ config │ │observability│ │ secrets  │  │  │
//!                        │  │  └────────┘ └─────────────┘ └──────────┘  │  │
//!                        │  └───────────────────────────────────────────┘  │
//!                        └─────────────────────────────────────────────────┘
//! ```

use alloy::primitives::Address;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use locket_voucher::chain::{ChainClient, Wallet};
use locket_voucher::claim::ClaimService;
use locket_voucher::config::{load_config, VoucherConfig};
use locket_voucher::http::HttpServer;
use locket_voucher::profile::XProfileResolver;
use locket_voucher::storage::IpfsPublisher;
use locket_voucher::voucher::VoucherIssuer;

#[derive(Parser, Debug)]
#[command(name = "locket-voucher", about = "Eligibility-gated signed mint-voucher service")]
struct Args {
    /// Path to the TOML configuration file. Built-in defaults are used
    /// when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "locket_voucher=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("locket-voucher v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => VoucherConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.chain.rpc_url,
        activity_threshold = config.chain.activity_threshold,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Process-wide secrets, loaded once at startup and injected as
    // explicit dependencies below.
    let wallet = Wallet::from_env(config.chain.chain_id)?;

    let contract: Address = config.chain.contract_address.parse()?;
    let upstream_timeout = Duration::from_secs(config.timeouts.upstream_secs);

    let chain = Arc::new(ChainClient::new(config.chain.clone()).await?);
    let resolver = Arc::new(XProfileResolver::new(&config.profile, upstream_timeout)?);
    let publisher = Arc::new(IpfsPublisher::from_env(&config.storage, upstream_timeout)?);
    let issuer = VoucherIssuer::new(wallet, contract);

    let claims = Arc::new(ClaimService::new(
        chain,
        resolver.clone(),
        publisher,
        issuer,
        contract,
        config.chain.activity_threshold,
    ));

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            locket_voucher::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(config, claims, resolver);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
