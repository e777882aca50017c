//! Mint voucher types.

use alloy::primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// The unsigned mint-authorization payload.
///
/// Canonically encoded (EIP-712) before signing; the verifying contract
/// recomputes the same encoding to check the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintVoucher {
    /// Wallet the token will be minted to.
    pub recipient: Address,
    /// Content address of the token metadata document.
    pub metadata_uri: String,
    /// Number of tokens authorized. Fixed at 1: the collection is
    /// soulbound, one per eligible wallet.
    pub quantity: u64,
    /// Unique voucher identifier. The contract records spent uids, so a
    /// voucher authorizes exactly one mint.
    pub uid: B256,
}

/// A voucher signed by the admin wallet.
///
/// Issued to the caller and never retained by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedVoucher {
    /// The original voucher payload.
    pub voucher: MintVoucher,
    /// 65-byte ECDSA signature over the voucher's canonical encoding.
    pub signature: Bytes,
    /// The EIP-712 digest that was signed.
    pub hash: B256,
}
