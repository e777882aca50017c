//! Profile resolution subsystem.

pub mod resolver;

pub use resolver::{
    normalize_handle, upgrade_image_url, ProfileError, ProfileResolver, ProfileResult,
    XProfileResolver,
};
