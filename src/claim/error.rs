//! Claim pipeline error definitions.
//!
//! Every external-dependency failure is mapped to exactly one of these
//! kinds at the orchestrator boundary; no raw upstream error text crosses
//! it beyond a human-readable message.

use thiserror::Error;

use crate::artwork::ComposeError;
use crate::chain::ChainError;
use crate::profile::ProfileError;
use crate::storage::StorageError;
use crate::voucher::VoucherError;

/// Errors surfaced by the claim pipeline.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Malformed wallet address. User-correctable.
    #[error("Invalid wallet address")]
    InvalidAddress,

    /// Empty handle after normalization. User-correctable.
    #[error("No handle provided")]
    InvalidHandle,

    /// Activity count below the threshold.
    #[error("Not eligible")]
    NotEligible { observed: u64, threshold: u64 },

    /// The wallet's token balance is already non-zero.
    #[error("Already claimed")]
    AlreadyClaimed,

    /// No profile image could be resolved for the handle.
    #[error("Profile pic not found")]
    ProfileNotFound,

    /// RPC, profile host, or storage gateway failure. Transient; the
    /// caller may retry. Never conflated with a negative eligibility
    /// answer.
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    /// Internal misconfiguration around the signing key. Fatal.
    #[error("Signing failure: {0}")]
    Signing(String),
}

impl From<ChainError> for ClaimError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InvalidAddress(_) => ClaimError::InvalidAddress,
            ChainError::Rpc(msg) => ClaimError::Upstream(msg),
            ChainError::ChainMismatch { expected, actual } => ClaimError::Upstream(format!(
                "Chain ID mismatch: expected {}, got {}",
                expected, actual
            )),
            ChainError::Wallet(msg) => ClaimError::Signing(msg),
        }
    }
}

impl From<ProfileError> for ClaimError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::InvalidHandle => ClaimError::InvalidHandle,
            ProfileError::FetchFailed | ProfileError::NotFound => ClaimError::ProfileNotFound,
            ProfileError::Upstream(msg) => ClaimError::Upstream(msg),
        }
    }
}

impl From<ComposeError> for ClaimError {
    fn from(_: ComposeError) -> Self {
        // The resolver only hands over parsed URLs, so a malformed image
        // URL means the upstream page produced junk.
        ClaimError::ProfileNotFound
    }
}

impl From<StorageError> for ClaimError {
    fn from(err: StorageError) -> Self {
        ClaimError::Upstream(err.to_string())
    }
}

impl From<VoucherError> for ClaimError {
    fn from(err: VoucherError) -> Self {
        ClaimError::Signing(err.to_string())
    }
}
