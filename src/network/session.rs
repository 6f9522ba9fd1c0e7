//! Conversion sessions and the HTTP dimension resolver.

use futures::future::BoxFuture;
use reqwest::StatusCode;

use crate::core::{AmpifyError, AmpifyOptions, ImageSizeFailure, ImageSizeResult};
use crate::network::cache::ImageSizeCache;
use crate::parsers::image::sniff_dimensions;
use crate::utils::url::is_fetchable_url;

/// Resolves the pixel dimensions of the image behind a URL.
///
/// The production implementation fetches over HTTP; tests substitute
/// resolvers that script their outcomes.
pub trait ImageSizeResolver: Send + Sync {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ImageSizeResult>;
}

/// Fetches image bytes over HTTP and reads the dimensions out of them.
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    pub fn new(options: &AmpifyOptions) -> Result<HttpResolver, AmpifyError> {
        let mut builder = reqwest::Client::builder().timeout(options.image_timeout);
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| AmpifyError::Client(err.to_string()))?;

        Ok(HttpResolver { client })
    }

    async fn fetch(&self, url: &str) -> ImageSizeResult {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| request_failure(url, err))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ImageSizeFailure::NotFound(url.to_string())),
            StatusCode::REQUEST_TIMEOUT => return Err(ImageSizeFailure::TimedOut(url.to_string())),
            status if !status.is_success() => {
                return Err(ImageSizeFailure::Request(format!("{} ({})", url, status)))
            }
            _ => {}
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| request_failure(url, err))?;

        sniff_dimensions(&bytes)
    }
}

impl ImageSizeResolver for HttpResolver {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ImageSizeResult> {
        Box::pin(self.fetch(url))
    }
}

fn request_failure(url: &str, err: reqwest::Error) -> ImageSizeFailure {
    if err.is_timeout() {
        ImageSizeFailure::TimedOut(url.to_string())
    } else {
        ImageSizeFailure::Request(format!("{}: {}", url, err))
    }
}

/// State shared across conversions: the resolver and its dimension cache.
///
/// A session is cheap to share behind a reference. Converting several
/// fragments through one session reuses every settled dimension lookup.
pub struct Session {
    options: AmpifyOptions,
    resolver: Box<dyn ImageSizeResolver>,
    cache: ImageSizeCache,
}

impl Session {
    /// Creates a session with the HTTP resolver described by `options`.
    pub fn new(options: AmpifyOptions) -> Result<Session, AmpifyError> {
        let resolver = HttpResolver::new(&options)?;

        Ok(Session::with_resolver(options, Box::new(resolver)))
    }

    /// Creates a session around a caller-supplied resolver.
    pub fn with_resolver(options: AmpifyOptions, resolver: Box<dyn ImageSizeResolver>) -> Session {
        Session {
            options,
            resolver,
            cache: ImageSizeCache::new(),
        }
    }

    /// The options this session was created with.
    pub fn options(&self) -> &AmpifyOptions {
        &self.options
    }

    /// Looks up the dimensions of the image behind `url`.
    ///
    /// URLs that are not absolute http or https fail immediately without
    /// touching the network or the cache. Everything else resolves once
    /// and is remembered for the lifetime of the session.
    pub async fn image_size(&self, url: &str) -> ImageSizeResult {
        if !is_fetchable_url(url) {
            return Err(ImageSizeFailure::InvalidUrl(url.to_string()));
        }

        self.cache.fetch(url, self.resolver.as_ref()).await
    }

    /// Number of sources with a cached outcome.
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }
}
