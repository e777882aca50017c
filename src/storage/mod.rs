//! Content-addressable storage subsystem.

pub mod publisher;

pub use publisher::{
    content_id, ContentPublisher, IpfsPublisher, StorageError, StorageResult,
    STORAGE_TOKEN_ENV_VAR,
};
