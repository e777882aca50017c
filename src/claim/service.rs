//! Claim pipeline orchestration.
//!
//! # Data Flow
//! ```text
//! (wallet, handle)
//!     → validate input (address checksum, handle normalization)
//!     → chain: activity count gate
//!     → chain: already-claimed gate (token balance)
//!     → profile: resolve image URL
//!     → artwork: compose locket SVG
//!     → storage: publish artwork, then metadata
//!     → voucher: sign and return
//! ```
//!
//! Every step short-circuits to a typed error; nothing is retried; no
//! state survives the request. Eligibility is recomputed from chain reads
//! on every call - the chain is the single source of truth for "has this
//! wallet already claimed".

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::artwork;
use crate::chain::{parse_wallet_address, ChainReader};
use crate::claim::error::ClaimError;
use crate::profile::{normalize_handle, ProfileResolver};
use crate::storage::ContentPublisher;
use crate::voucher::{SignedVoucher, VoucherIssuer};

/// Outcome of the eligibility gates for one wallet.
///
/// Derived per request, never persisted. When the activity gate fails the
/// balance is not read and `already_claimed` stays false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub observed_activity_count: u64,
    pub already_claimed: bool,
}

/// Token metadata document published alongside the artwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

impl MintMetadata {
    /// Template the metadata document for a handle and published artwork.
    pub fn for_handle(handle: &str, image_uri: &str) -> Self {
        Self {
            name: format!("Monad Soulbound NFT for @{}", handle),
            description:
                "Soulbound NFT with your X profile embedded in the official Monad diamond locket."
                    .to_string(),
            image: image_uri.to_string(),
        }
    }
}

/// Orchestrates the claim pipeline.
///
/// All collaborators are injected at construction; the service itself is
/// stateless across requests.
#[derive(Clone)]
pub struct ClaimService {
    chain: Arc<dyn ChainReader>,
    resolver: Arc<dyn ProfileResolver>,
    publisher: Arc<dyn ContentPublisher>,
    issuer: VoucherIssuer,
    contract: Address,
    activity_threshold: u64,
}

impl ClaimService {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        resolver: Arc<dyn ProfileResolver>,
        publisher: Arc<dyn ContentPublisher>,
        issuer: VoucherIssuer,
        contract: Address,
        activity_threshold: u64,
    ) -> Self {
        Self {
            chain,
            resolver,
            publisher,
            issuer,
            contract,
            activity_threshold,
        }
    }

    /// Run the eligibility gates for a wallet.
    ///
    /// The activity gate runs first; the balance read is skipped when it
    /// fails, so a wallet below the threshold costs one RPC call.
    pub async fn check_eligibility(&self, wallet: Address) -> Result<EligibilityResult, ClaimError> {
        let observed = self.chain.activity_count(wallet).await?;
        if observed < self.activity_threshold {
            return Ok(EligibilityResult {
                eligible: false,
                observed_activity_count: observed,
                already_claimed: false,
            });
        }

        let balance = self.chain.token_balance(self.contract, wallet).await?;
        let already_claimed = balance > U256::ZERO;

        Ok(EligibilityResult {
            eligible: !already_claimed,
            observed_activity_count: observed,
            already_claimed,
        })
    }

    /// Process a claim end to end, returning a signed voucher.
    pub async fn process(&self, wallet: &str, handle: &str) -> Result<SignedVoucher, ClaimError> {
        let recipient = parse_wallet_address(wallet)?;
        let handle = normalize_handle(handle)?.to_string();

        let eligibility = self.check_eligibility(recipient).await?;
        if eligibility.already_claimed {
            tracing::info!(wallet = %recipient, "Claim rejected: already claimed");
            return Err(ClaimError::AlreadyClaimed);
        }
        if !eligibility.eligible {
            tracing::info!(
                wallet = %recipient,
                observed = eligibility.observed_activity_count,
                threshold = self.activity_threshold,
                "Claim rejected: below activity threshold"
            );
            return Err(ClaimError::NotEligible {
                observed: eligibility.observed_activity_count,
                threshold: self.activity_threshold,
            });
        }

        let image_url = self.resolver.resolve_image(&handle).await?;
        let svg = artwork::compose(image_url.as_str())?;
        let image_uri = self
            .publisher
            .publish(svg.as_bytes(), "image/svg+xml")
            .await?;

        let metadata = MintMetadata::for_handle(&handle, &image_uri);
        let metadata_bytes = serde_json::to_vec(&metadata)
            .map_err(|e| ClaimError::Signing(format!("metadata serialization failed: {}", e)))?;
        let metadata_uri = self
            .publisher
            .publish(&metadata_bytes, "application/json")
            .await?;

        let signed = self.issuer.issue(recipient, metadata_uri)?;

        tracing::info!(
            wallet = %recipient,
            handle = %handle,
            metadata_uri = %signed.voucher.metadata_uri,
            "Claim approved"
        );

        Ok(signed)
    }
}
