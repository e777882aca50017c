//! Claim orchestration subsystem.

pub mod error;
pub mod service;

pub use error::ClaimError;
pub use service::{ClaimService, EligibilityResult, MintMetadata};
