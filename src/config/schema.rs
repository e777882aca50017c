//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the voucher
//! service. All types derive Serde traits for deserialization from config
//! files. Secrets (signing key, storage token) are never part of this
//! schema; they are read from environment variables at startup.

use serde::{Deserialize, Serialize};

/// Root configuration for the voucher service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VoucherConfig {
    /// Listener configuration (bind address, connection limits).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Chain RPC and eligibility settings.
    pub chain: ChainConfig,

    /// Profile image source settings.
    pub profile: ProfileConfig,

    /// Content-addressable storage gateway settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Covers the full claim pipeline: RPC reads, profile fetch, two
    /// storage publishes, and signing.
    pub request_secs: u64,

    /// Timeout for each outbound HTTP call (profile fetch, storage
    /// publish) in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 10,
        }
    }
}

/// Chain RPC and eligibility configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 10143 for Monad testnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Address of the soulbound token contract that verifies vouchers.
    pub contract_address: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Minimum transaction count a wallet needs to qualify for a voucher.
    pub activity_threshold: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet-rpc.monad.xyz".to_string(),
            failover_urls: Vec::new(),
            chain_id: 10143,
            contract_address: String::new(),
            rpc_timeout_secs: 10,
            activity_threshold: 5000,
        }
    }
}

/// Profile image source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Base URL of the profile host; the handle is appended as a path
    /// segment.
    pub base_url: String,

    /// User-Agent sent with profile page fetches. The upstream host
    /// rejects non-browser identities.
    pub user_agent: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            base_url: "https://x.com".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// Content-addressable storage gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base URL of the storage gateway API.
    pub api_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            api_url: "https://storage.thirdweb.com".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VoucherConfig::default();
        assert_eq!(config.chain.activity_threshold, 5000);
        assert_eq!(config.chain.chain_id, 10143);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: VoucherConfig = toml::from_str(
            r#"
            [chain]
            contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
            activity_threshold = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.chain.activity_threshold, 100);
        // Unspecified sections fall back to defaults
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.profile.base_url, "https://x.com");
    }
}
