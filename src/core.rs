//! Core types and entry points: conversion options, the error taxonomy,
//! and the `convert` functions that tie parsing, traversal, and
//! serialization together.

use std::time::Duration;

use thiserror::Error;

use crate::network::session::Session;
use crate::parsers::html::dom::html_to_nodes;
use crate::parsers::html::serializer::nodes_to_html;
use crate::parsers::html::walker::walk;

/// Fatal conversion errors.
///
/// Anything that goes wrong around a single image lookup is handled locally
/// by the tag rules and never surfaces here; see [`ImageSizeFailure`].
#[derive(Error, Debug)]
pub enum AmpifyError {
    /// The input markup could not be parsed into a node tree.
    #[error("failed to parse input markup: {0}")]
    Parse(String),
    /// The transformed tree could not be rendered back to a string.
    #[error("failed to serialize document: {0}")]
    Serialize(String),
    /// The HTTP client could not be constructed.
    #[error("failed to initialize network client: {0}")]
    Client(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Reasons a single image dimension lookup can fail.
///
/// Only `TimedOut` lets the image still convert (with fallback dimensions);
/// every other kind reverts the element to a plain `img`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSizeFailure {
    /// The src value is empty, relative, or not an http(s) URL.
    #[error("URL invalid: {0}")]
    InvalidUrl(String),
    /// The request did not complete within the configured budget.
    #[error("request timed out: {0}")]
    TimedOut(String),
    /// The server answered 404.
    #[error("image not found: {0}")]
    NotFound(String),
    /// The downloaded bytes are not a recognized image format.
    #[error("unreadable image data: {0}")]
    Unreadable(String),
    /// Any other transport error or non-success status.
    #[error("image request failed: {0}")]
    Request(String),
}

/// Outcome of a dimension lookup.
pub type ImageSizeResult = Result<ImageDimensions, ImageSizeFailure>;

/// Conversion options.
#[derive(Debug, Clone)]
pub struct AmpifyOptions {
    /// Time budget for a single image dimension request.
    pub image_timeout: Duration,
    /// User-Agent header sent with image requests; `None` sends no header.
    pub user_agent: Option<String>,
}

impl Default for AmpifyOptions {
    fn default() -> AmpifyOptions {
        AmpifyOptions {
            // Some image hosts refuse requests that carry no User-Agent
            user_agent: Some(String::from("Mozilla/5.0")),
            image_timeout: Duration::from_secs(5),
        }
    }
}

/// Converts an HTML fragment into AMP HTML using default options.
pub async fn convert(html: &str) -> Result<String, AmpifyError> {
    convert_with_options(html, AmpifyOptions::default()).await
}

/// Converts an HTML fragment into AMP HTML.
///
/// A fresh [`Session`] (and therefore a fresh dimension cache) is created
/// for this one conversion; use [`convert_with_session`] to share cached
/// lookups across documents.
///
/// # Arguments
///
/// * `html` - markup to convert, a fragment or a document body
/// * `options` - conversion options
///
/// # Returns
///
/// The converted markup, or an [`AmpifyError`] if the input could not be
/// parsed or the result could not be serialized.
pub async fn convert_with_options(
    html: &str,
    options: AmpifyOptions,
) -> Result<String, AmpifyError> {
    let session = Session::new(options)?;
    convert_with_session(html, &session).await
}

/// Converts an HTML fragment into AMP HTML using an existing session.
pub async fn convert_with_session(html: &str, session: &Session) -> Result<String, AmpifyError> {
    let mut nodes = html_to_nodes(html)?;
    walk(session, &mut nodes).await;
    nodes_to_html(&nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = AmpifyOptions::default();

        assert_eq!(options.image_timeout, Duration::from_secs(5));
        assert_eq!(options.user_agent.as_deref(), Some("Mozilla/5.0"));
    }

    #[test]
    fn failure_messages_carry_the_cause() {
        let failure = ImageSizeFailure::NotFound(String::from("http://example.com/a.png"));

        assert_eq!(
            failure.to_string(),
            "image not found: http://example.com/a.png"
        );
        assert_eq!(
            ImageSizeFailure::TimedOut(String::from("http://example.com/b.png")).to_string(),
            "request timed out: http://example.com/b.png"
        );
    }
}
