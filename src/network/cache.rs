//! Caching and coalescing of image dimension lookups.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::core::ImageSizeResult;
use crate::network::session::ImageSizeResolver;

/// Cache of settled dimension lookups, keyed by source URL.
///
/// Every URL resolves at most once per cache. Concurrent lookups for the
/// same URL coalesce onto a single in-flight request, and failures are
/// remembered just like successes so a broken source is not refetched.
pub struct ImageSizeCache {
    entries: DashMap<String, Arc<OnceCell<ImageSizeResult>>>,
}

impl ImageSizeCache {
    pub fn new() -> ImageSizeCache {
        ImageSizeCache {
            entries: DashMap::new(),
        }
    }

    /// Returns the outcome for `url`, resolving it on first use.
    pub async fn fetch(&self, url: &str, resolver: &dyn ImageSizeResolver) -> ImageSizeResult {
        // Clone the cell out of the map so no shard lock is held while
        // the lookup is in flight
        let cell = self
            .entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        if let Some(result) = cell.get() {
            tracing::debug!("image size cache hit for {}", url);
            return result.clone();
        }

        cell.get_or_init(|| {
            tracing::debug!("image size cache miss for {}", url);
            resolver.resolve(url)
        })
        .await
        .clone()
    }

    /// Number of sources with a settled or in-flight entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ImageSizeCache {
    fn default() -> ImageSizeCache {
        ImageSizeCache::new()
    }
}
