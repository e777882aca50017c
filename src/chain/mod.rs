//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (signing key)
//!     → wallet.rs (key loading, digest signing)
//! Config (RPC URLs, contract, threshold)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → types.rs (ChainReader seam consumed by the claim pipeline)
//! ```
//!
//! # Security Constraints
//! - Private key ONLY from an environment variable
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Address input is validated before any network call

pub mod client;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use types::{parse_wallet_address, ChainError, ChainReader, ChainResult};
pub use wallet::Wallet;
