//! Artwork composition subsystem.

pub mod composer;

pub use composer::{compose, ComposeError, CANVAS_SIZE};
