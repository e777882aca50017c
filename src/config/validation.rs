//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, threshold > 0)
//! - Check addresses and URLs parse before any subsystem starts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: VoucherConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::VoucherConfig;
use alloy::primitives::Address;
use std::str::FromStr;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the error refers to (e.g., "chain.rpc_url").
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &VoucherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".into(),
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".into(),
            message: "must be greater than zero".into(),
        });
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.upstream_secs".into(),
            message: "must be greater than zero".into(),
        });
    }

    if url::Url::parse(&config.chain.rpc_url).is_err() {
        errors.push(ValidationError {
            field: "chain.rpc_url".into(),
            message: format!("not a valid URL: {}", config.chain.rpc_url),
        });
    }
    for (i, failover) in config.chain.failover_urls.iter().enumerate() {
        if url::Url::parse(failover).is_err() {
            errors.push(ValidationError {
                field: format!("chain.failover_urls[{}]", i),
                message: format!("not a valid URL: {}", failover),
            });
        }
    }
    if Address::from_str(&config.chain.contract_address).is_err() {
        errors.push(ValidationError {
            field: "chain.contract_address".into(),
            message: "not a valid contract address".into(),
        });
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.rpc_timeout_secs".into(),
            message: "must be greater than zero".into(),
        });
    }
    if config.chain.activity_threshold == 0 {
        errors.push(ValidationError {
            field: "chain.activity_threshold".into(),
            message: "must be greater than zero".into(),
        });
    }

    if url::Url::parse(&config.profile.base_url).is_err() {
        errors.push(ValidationError {
            field: "profile.base_url".into(),
            message: format!("not a valid URL: {}", config.profile.base_url),
        });
    }

    if url::Url::parse(&config.storage.api_url).is_err() {
        errors.push(ValidationError {
            field: "storage.api_url".into(),
            message: format!("not a valid URL: {}", config.storage.api_url),
        });
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".into(),
            message: format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
