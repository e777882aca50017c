//! Chain-specific types and error definitions.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Malformed or checksum-failing wallet address. Raised before any
    /// network call.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// RPC connection or request failed. Transient; distinct from a
    /// negative eligibility answer.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Read-only chain queries the claim pipeline depends on.
///
/// Kept behind a trait so the orchestrator can be exercised without an
/// RPC endpoint.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Number of transactions the address has sent (its activity count).
    async fn activity_count(&self, address: Address) -> ChainResult<u64>;

    /// ERC-721 balance of `owner` under `contract`.
    async fn token_balance(&self, contract: Address, owner: Address) -> ChainResult<U256>;
}

/// Parse a user-supplied wallet address, enforcing EIP-55 where it applies.
///
/// Mixed-case input carries checksum bits and must pass EIP-55
/// verification; all-lowercase or all-uppercase input carries none and is
/// accepted as plain hex. Malformed input is rejected here, before any
/// RPC call is made.
pub fn parse_wallet_address(input: &str) -> ChainResult<Address> {
    let trimmed = input.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(trimmed.to_string()));
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{}", hex_part), None)
            .map_err(|_| ChainError::InvalidAddress(trimmed.to_string()))
    } else {
        Address::from_str(hex_part).map_err(|_| ChainError::InvalidAddress(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's first account, correctly checksummed.
    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_parse_checksummed_address() {
        let addr = parse_wallet_address(CHECKSUMMED).unwrap();
        assert_eq!(addr.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn test_parse_lowercase_address() {
        let addr = parse_wallet_address(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(addr.to_checksum(None), CHECKSUMMED);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        // Flip the case of one checksummed character
        let mangled = CHECKSUMMED.replace("f39F", "F39F");
        assert!(matches!(
            parse_wallet_address(&mangled),
            Err(ChainError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_malformed_input_rejected() {
        for input in ["", "0x123", "not-an-address", "0xZZZd6e51aad88F6F4ce6aB8827279cffFb92266"] {
            assert!(parse_wallet_address(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::ChainMismatch {
            expected: 10143,
            actual: 1,
        };
        assert!(err.to_string().contains("10143"));
    }
}
