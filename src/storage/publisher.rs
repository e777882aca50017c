//! Content-addressable storage publishing.
//!
//! # Responsibilities
//! - Derive IPFS-compatible content identifiers (CIDv1, raw codec,
//!   SHA2-256) locally from the exact bytes being published
//! - Upload bytes to the storage gateway
//! - Return stable `ipfs://` content addresses
//!
//! The address is a pure function of content: publishing identical bytes
//! twice yields the same address, and the gateway write is idempotent.

use async_trait::async_trait;
use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

use crate::config::StorageConfig;

/// Environment variable name for the storage gateway token.
pub const STORAGE_TOKEN_ENV_VAR: &str = "VOUCHER_STORAGE_TOKEN";

/// Multicodec code for raw binary content.
const RAW_CODEC: u64 = 0x55;

/// Errors that can occur during publishing.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Gateway credentials missing at startup.
    #[error("Environment variable {0} not set")]
    MissingToken(&'static str),

    /// Network-level failure reaching the gateway. Transient.
    #[error("Storage gateway unreachable: {0}")]
    Unavailable(String),

    /// Gateway refused the upload.
    #[error("Storage gateway rejected upload with status {0}")]
    Rejected(u16),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Publishes bytes to content-addressable storage.
#[async_trait]
pub trait ContentPublisher: Send + Sync {
    /// Publish `content`, returning its stable content address.
    async fn publish(&self, content: &[u8], content_type: &str) -> StorageResult<String>;
}

/// Derive the CIDv1 (raw codec, SHA2-256) for a byte string.
pub fn content_id(content: &[u8]) -> Cid {
    let hash = Code::Sha2_256.digest(content);
    Cid::new_v1(RAW_CODEC, hash)
}

/// Publisher backed by an IPFS-style HTTP gateway.
pub struct IpfsPublisher {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl IpfsPublisher {
    /// Create a publisher with an explicit gateway token.
    pub fn new(config: &StorageConfig, token: String, timeout: Duration) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create a publisher reading the token from `VOUCHER_STORAGE_TOKEN`.
    pub fn from_env(config: &StorageConfig, timeout: Duration) -> StorageResult<Self> {
        let token = std::env::var(STORAGE_TOKEN_ENV_VAR)
            .map_err(|_| StorageError::MissingToken(STORAGE_TOKEN_ENV_VAR))?;
        Self::new(config, token, timeout)
    }
}

#[async_trait]
impl ContentPublisher for IpfsPublisher {
    async fn publish(&self, content: &[u8], content_type: &str) -> StorageResult<String> {
        let cid = content_id(content);
        let upload_url = format!("{}/ipfs/{}", self.api_url, cid);

        let response = self
            .client
            .put(&upload_url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, content_type)
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), cid = %cid, "Storage upload rejected");
            return Err(StorageError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(cid = %cid, bytes = content.len(), "Content published");
        Ok(format!("ipfs://{}", cid))
    }
}
