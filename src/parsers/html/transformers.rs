//! Element-level AMP rewrites.
//!
//! Each transformer takes a mutable element and rewrites its tag name and
//! attributes in place. Dimension lookups go through the session so that
//! repeated sources are only fetched once.

use crate::core::ImageSizeFailure;
use crate::network::session::Session;

use super::dom::Element;

/// Attribute values applied when a converted element does not provide its own.
pub struct AmpDefaults {
    pub width: u32,
    pub height: u32,
    pub layout: &'static str,
    pub sandbox: Option<&'static str>,
}

/// Defaults for `amp-img` and `amp-anim`.
pub const IMAGE_DEFAULTS: AmpDefaults = AmpDefaults {
    width: 600,
    height: 400,
    layout: "responsive",
    sandbox: None,
};

/// Defaults for `amp-iframe`, which also carries a sandbox.
pub const IFRAME_DEFAULTS: AmpDefaults = AmpDefaults {
    width: 600,
    height: 400,
    layout: "responsive",
    sandbox: Some("allow-scripts allow-same-origin"),
};

/// Rewrites an `img` into `amp-img` (or `amp-anim` for gifs) with measured
/// dimensions.
///
/// The real dimensions replace any author-supplied `width` and `height`.
/// When the lookup times out the element still converts with the default
/// dimensions; any other failure reverts the tag to `img` and records the
/// cause on the element.
pub async fn transform_img(session: &Session, element: &mut Element) {
    let src = match element.attr("src") {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => return,
    };

    element.name = if src.ends_with(".gif") {
        "amp-anim".to_string()
    } else {
        "amp-img".to_string()
    };

    match session.image_size(&src).await {
        Ok(dimensions) => {
            element.set_attr("width", &dimensions.width.to_string());
            element.set_attr("height", &dimensions.height.to_string());
        }
        Err(ImageSizeFailure::TimedOut(_)) => {
            tracing::debug!(
                "image size lookup timed out for {}, applying default dimensions",
                src
            );
            element.set_attr("width", &IMAGE_DEFAULTS.width.to_string());
            element.set_attr("height", &IMAGE_DEFAULTS.height.to_string());
        }
        Err(failure) => {
            tracing::warn!("image size lookup failed for {}: {}", src, failure);
            element.name = "img".to_string();
            element.failure = Some(failure.to_string());
            return;
        }
    }

    apply_layout(element, &IMAGE_DEFAULTS);
}

/// Rewrites an `iframe` into `amp-iframe`.
///
/// Missing `width`, `height`, and `sandbox` attributes are filled from
/// [`IFRAME_DEFAULTS`], but only when the element lacks at least one of
/// `width`, `height`, or `layout`. The source is upgraded to https because
/// AMP refuses to load insecure frames.
pub fn transform_iframe(element: &mut Element) {
    element.name = "amp-iframe".to_string();

    if !element.has_attr_value("width")
        || !element.has_attr_value("height")
        || !element.has_attr_value("layout")
    {
        if !element.has_attr_value("width") {
            element.set_attr("width", &IFRAME_DEFAULTS.width.to_string());
        }
        if !element.has_attr_value("height") {
            element.set_attr("height", &IFRAME_DEFAULTS.height.to_string());
        }
        if !element.has_attr_value("sandbox") {
            if let Some(sandbox) = IFRAME_DEFAULTS.sandbox {
                element.set_attr("sandbox", sandbox);
            }
        }
    }

    use_secure_schema(element);
    apply_layout(element, &IFRAME_DEFAULTS);
}

/// Rewrites an `audio` element into `amp-audio`. Children such as `source`
/// and `track` pass through untouched.
pub fn transform_audio(element: &mut Element) {
    element.name = "amp-audio".to_string();
}

/// Fills in the `layout` attribute unless the author already set one.
///
/// Elements narrower than 300 pixels get a fixed layout; everything else,
/// including elements whose width does not parse as a number, falls back to
/// the default layout.
fn apply_layout(element: &mut Element, defaults: &AmpDefaults) {
    if element.has_attr_value("layout") {
        return;
    }

    let layout = match element.attr("width").and_then(parse_dimension) {
        Some(width) if width < 300.0 => "fixed",
        _ => defaults.layout,
    };

    element.set_attr("layout", layout);
}

fn parse_dimension(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

/// Upgrades an insecure frame source to https. Sources that already mention
/// https anywhere are left alone, as are sources with other schemes.
fn use_secure_schema(element: &mut Element) {
    let secured = match element.attr("src") {
        Some(src) if !src.is_empty() && !src.contains("https://") => {
            if let Some(rest) = src.strip_prefix("http://") {
                Some(format!("https://{}", rest))
            } else if src.starts_with("//") {
                Some(format!("https:{}", src))
            } else {
                None
            }
        }
        _ => None,
    };

    if let Some(src) = secured {
        element.set_attr("src", &src);
    }
}
