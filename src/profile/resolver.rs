//! Profile image resolution from the public profile page.
//!
//! # Responsibilities
//! - Normalize handles (strip leading `@`)
//! - Fetch the profile page with a browser identity
//! - Extract the first profile image element
//! - Upgrade thumbnail URLs to the high-resolution variant
//!
//! The page-scraping contract is unstable by nature; everything specific
//! to the upstream host lives behind the `ProfileResolver` trait so it can
//! be swapped for an official API without touching the claim pipeline.

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::ProfileConfig;

/// Matches the first `<img>` element whose `src` points at a profile
/// image. The upstream host serves avatars from a `profile_images` path.
const PROFILE_IMAGE_PATTERN: &str = r#"<img[^>]*\bsrc="([^"]*profile_images[^"]*)""#;

/// Errors that can occur during profile resolution.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Handle was empty after normalization.
    #[error("No handle provided")]
    InvalidHandle,

    /// The profile page fetch returned a non-success status.
    #[error("Failed to fetch X profile")]
    FetchFailed,

    /// The page loaded but contained no profile image element.
    #[error("Profile pic not found")]
    NotFound,

    /// Network-level failure reaching the profile host. Transient.
    #[error("Profile host unreachable: {0}")]
    Upstream(String),
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Resolves a social handle to a public profile image URL.
#[async_trait]
pub trait ProfileResolver: Send + Sync {
    async fn resolve_image(&self, handle: &str) -> ProfileResult<Url>;
}

/// Strip the leading `@` and surrounding whitespace from a handle.
///
/// Fails if nothing remains after normalization.
pub fn normalize_handle(raw: &str) -> ProfileResult<&str> {
    let handle = raw.trim();
    let handle = handle.strip_prefix('@').unwrap_or(handle);
    if handle.is_empty() {
        Err(ProfileError::InvalidHandle)
    } else {
        Ok(handle)
    }
}

/// Upgrade a profile image URL to its high-resolution variant.
///
/// The image host serves avatar thumbnails with a `_normal` filename
/// suffix and publishes a `_400x400` variant at the same path. This
/// substitution is the host's documented URL scheme; if the host changes
/// it, only this function needs to move.
pub fn upgrade_image_url(url: &str) -> String {
    url.replacen("_normal", "_400x400", 1)
}

/// Resolver backed by the X profile page.
pub struct XProfileResolver {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    image_pattern: Regex,
}

impl XProfileResolver {
    /// Create a resolver with the given upstream settings and per-request
    /// timeout.
    pub fn new(config: &ProfileConfig, timeout: Duration) -> ProfileResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProfileError::Upstream(e.to_string()))?;

        let image_pattern =
            Regex::new(PROFILE_IMAGE_PATTERN).expect("profile image pattern is valid");

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            image_pattern,
        })
    }

    /// Extract the first profile image URL from page markup.
    fn extract_image_src<'a>(&self, html: &'a str) -> Option<&'a str> {
        self.image_pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

#[async_trait]
impl ProfileResolver for XProfileResolver {
    async fn resolve_image(&self, handle: &str) -> ProfileResult<Url> {
        let handle = normalize_handle(handle)?;

        let page_url = format!("{}/{}", self.base_url, handle);
        let response = self
            .client
            .get(&page_url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| ProfileError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(handle = %handle, status = %response.status(), "Profile page fetch failed");
            return Err(ProfileError::FetchFailed);
        }

        let html = response
            .text()
            .await
            .map_err(|e| ProfileError::Upstream(e.to_string()))?;

        let src = self.extract_image_src(&html).ok_or(ProfileError::NotFound)?;
        let upgraded = upgrade_image_url(src);

        Url::parse(&upgraded).map_err(|_| ProfileError::NotFound)
    }
}
