//! Voucher issuance subsystem.
//!
//! # Data Flow
//! ```text
//! (recipient, metadata content address)
//!     → types.rs (MintVoucher payload, quantity fixed at 1)
//!     → issuer.rs (EIP-712 canonical encoding → admin signature)
//!     → SignedVoucher (returned to caller, never retained)
//! ```

pub mod issuer;
pub mod types;

pub use issuer::{VoucherError, VoucherIssuer, VoucherResult};
pub use types::{MintVoucher, SignedVoucher};
