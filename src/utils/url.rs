use url::Url;

/// Checks whether the input is an absolute URL this crate is willing to
/// fetch image bytes from.
///
/// Relative paths, protocol-relative references, and non-http(s) schemes
/// (such as `data:`) all fail the check; their dimensions cannot be
/// resolved without a base URL or a scheme handler.
pub fn is_fetchable_url(input: &str) -> bool {
    match Url::parse(input) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}
