//! Voucher assembly and signing.
//!
//! # Responsibilities
//! - Build the canonical mint-authorization payload
//! - Compute the EIP-712 signing hash under the verifying contract's domain
//! - Sign the digest with the admin wallet
//!
//! The encoding is a strict external contract: field order, types, and
//! the domain parameters are fixed by the verifying contract's signature
//! check. Any deviation silently produces vouchers the contract rejects.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::signers::Signature;
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use thiserror::Error;
use uuid::Uuid;

use crate::chain::Wallet;
use crate::voucher::types::{MintVoucher, SignedVoucher};

sol! {
    /// Canonical mint-authorization struct as the verifying contract
    /// declares it.
    struct MintRequest {
        address to;
        string uri;
        uint256 quantity;
        bytes32 uid;
    }
}

/// Errors that can occur during voucher issuance.
#[derive(Debug, Error)]
pub enum VoucherError {
    /// Signing failed; indicates key misconfiguration, fatal.
    #[error("Signing failure: {0}")]
    Signing(String),
}

/// Result type for voucher operations.
pub type VoucherResult<T> = Result<T, VoucherError>;

/// Issues signed mint vouchers.
#[derive(Clone)]
pub struct VoucherIssuer {
    wallet: Wallet,
    domain: Eip712Domain,
}

impl VoucherIssuer {
    /// Create an issuer bound to the verifying contract.
    ///
    /// The EIP-712 domain ties every signature to this chain and contract;
    /// a voucher signed here verifies nowhere else.
    pub fn new(wallet: Wallet, contract: Address) -> Self {
        let domain = Eip712Domain::new(
            Some("SignatureMintERC721".into()),
            Some("1".into()),
            Some(U256::from(wallet.chain_id())),
            Some(contract),
            None,
        );
        Self { wallet, domain }
    }

    /// Issue a signed, single-use voucher minting one token to `recipient`.
    pub fn issue(&self, recipient: Address, metadata_uri: String) -> VoucherResult<SignedVoucher> {
        let voucher = MintVoucher {
            recipient,
            metadata_uri,
            quantity: 1,
            uid: keccak256(Uuid::new_v4().as_bytes()),
        };

        let hash = self.signing_hash(&voucher);
        let signature = self
            .wallet
            .sign_hash(hash)
            .map_err(|e| VoucherError::Signing(e.to_string()))?;

        tracing::info!(
            recipient = %recipient,
            uid = %voucher.uid,
            "Voucher issued"
        );

        Ok(SignedVoucher {
            voucher,
            signature: Bytes::from(signature.as_bytes().to_vec()),
            hash,
        })
    }

    /// Compute the EIP-712 signing hash for a voucher payload.
    pub fn signing_hash(&self, voucher: &MintVoucher) -> B256 {
        let request = MintRequest {
            to: voucher.recipient,
            uri: voucher.metadata_uri.clone(),
            quantity: U256::from(voucher.quantity),
            uid: voucher.uid,
        };
        request.eip712_signing_hash(&self.domain)
    }

    /// Check a signed voucher against this issuer's key and domain.
    ///
    /// Recomputes the canonical encoding from the payload, so any mutated
    /// field fails verification.
    pub fn verify(&self, signed: &SignedVoucher) -> bool {
        let expected = self.signing_hash(&signed.voucher);
        let Ok(signature) = Signature::try_from(signed.signature.as_ref()) else {
            return false;
        };
        match signature.recover_address_from_prehash(&expected) {
            Ok(recovered) => recovered == self.wallet.address(),
            Err(_) => false,
        }
    }

    /// Address whose signatures the verifying contract accepts.
    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }
}
