//! Deterministic locket artwork composition.
//!
//! Renders the fixed diamond-locket scene with a profile image clipped
//! inside it. The output must be byte-identical for identical inputs:
//! the content address of the artwork is derived from these exact bytes.

use thiserror::Error;
use url::Url;

/// Canvas dimensions of the locket scene.
pub const CANVAS_SIZE: u32 = 400;

/// The diamond outline path, in canvas coordinates.
const DIAMOND_PATH: &str = "M200 20 L380 200 L200 380 L20 200 Z";

/// Brand stroke color of the diamond outline.
const DIAMOND_STROKE: &str = "#836EF9";

/// Stroke width of the diamond outline.
const DIAMOND_STROKE_WIDTH: u32 = 10;

/// Errors that can occur during composition.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The image URL did not parse.
    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

/// Compose the locket SVG around a profile image URL.
///
/// Pure and deterministic: identical `image_url` input yields
/// byte-identical markup. The only failure mode is a malformed URL.
pub fn compose(image_url: &str) -> Result<String, ComposeError> {
    let parsed =
        Url::parse(image_url).map_err(|_| ComposeError::InvalidImageUrl(image_url.to_string()))?;

    let href = escape_xml(parsed.as_str());

    Ok(format!(
        concat!(
            r#"<svg width="{size}" height="{size}" viewBox="0 0 {size} {size}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
            r#"<path id="diamond" d="{path}" fill="none" stroke="{stroke}" stroke-width="{stroke_width}"/>"#,
            r#"<clipPath id="clip"><use xlink:href="#diamond"/></clipPath>"#,
            r#"<image xlink:href="{href}" width="{size}" height="{size}" preserveAspectRatio="xMidYMid slice" clip-path="url(#clip)"/>"#,
            r#"</svg>"#
        ),
        size = CANVAS_SIZE,
        path = DIAMOND_PATH,
        stroke = DIAMOND_STROKE,
        stroke_width = DIAMOND_STROKE_WIDTH,
        href = href,
    ))
}

/// Escape a string for embedding in an XML attribute value.
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_URL: &str = "https://pbs.twimg.com/profile_images/1/alice_400x400.jpg";

    #[test]
    fn test_compose_is_deterministic() {
        let first = compose(IMAGE_URL).unwrap();
        let second = compose(IMAGE_URL).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_scene_structure() {
        let svg = compose(IMAGE_URL).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 400 400""#));
        assert!(svg.contains(DIAMOND_PATH));
        assert!(svg.contains(DIAMOND_STROKE));
        // Crop-to-fill, not letterbox
        assert!(svg.contains(r#"preserveAspectRatio="xMidYMid slice""#));
        assert!(svg.contains(r#"clip-path="url(#clip)""#));
        assert!(svg.contains(IMAGE_URL));
    }

    #[test]
    fn test_query_params_are_escaped() {
        let svg = compose("https://cdn.example/pic.jpg?a=1&b=2").unwrap();
        assert!(svg.contains("a=1&amp;b=2"));
        assert!(!svg.contains("a=1&b=2\""));
    }

    #[test]
    fn test_malformed_url_rejected() {
        assert!(matches!(
            compose("not a url"),
            Err(ComposeError::InvalidImageUrl(_))
        ));
    }

    #[test]
    fn test_different_inputs_differ() {
        let a = compose("https://cdn.example/a.jpg").unwrap();
        let b = compose("https://cdn.example/b.jpg").unwrap();
        assert_ne!(a, b);
    }
}
