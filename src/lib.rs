//! Eligibility-Gated Mint Voucher Service Library

// Core pipeline
pub mod artwork;
pub mod chain;
pub mod claim;
pub mod profile;
pub mod storage;
pub mod voucher;

// Cross-cutting concerns
pub mod config;
pub mod http;
pub mod observability;

pub use claim::ClaimService;
pub use config::VoucherConfig;
pub use http::HttpServer;
pub use voucher::{MintVoucher, SignedVoucher};
