// Integration test helpers
//
// Scripted resolvers and session builders shared by the test files.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;

use ampify::core::{AmpifyOptions, ImageDimensions, ImageSizeFailure, ImageSizeResult};
use ampify::network::session::{ImageSizeResolver, Session};

/// Resolver that serves scripted outcomes per URL and counts its calls.
///
/// URLs without a scripted outcome resolve to `NotFound`, so a forgotten
/// script line shows up as a reverted element rather than a panic.
pub struct MockResolver {
    outcomes: HashMap<String, ImageSizeResult>,
    delayed: HashSet<String>,
    calls: Arc<AtomicUsize>,
}

impl MockResolver {
    pub fn new() -> MockResolver {
        MockResolver {
            outcomes: HashMap::new(),
            delayed: HashSet::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scripts a successful lookup for `url`.
    pub fn sized(mut self, url: &str, width: u32, height: u32) -> MockResolver {
        self.outcomes
            .insert(url.to_string(), Ok(ImageDimensions { width, height }));
        self
    }

    /// Scripts a failing lookup for `url`.
    pub fn failing(mut self, url: &str, failure: ImageSizeFailure) -> MockResolver {
        self.outcomes.insert(url.to_string(), Err(failure));
        self
    }

    /// Defers the lookup for `url` until every undelayed lookup in flight
    /// has finished.
    pub fn delayed(mut self, url: &str) -> MockResolver {
        self.delayed.insert(url.to_string());
        self
    }

    /// Handle onto the resolver call counter, usable after the resolver
    /// moved into a session.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl ImageSizeResolver for MockResolver {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, ImageSizeResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = match self.outcomes.get(url) {
            Some(outcome) => outcome.clone(),
            None => Err(ImageSizeFailure::NotFound(url.to_string())),
        };
        let stalls = if self.delayed.contains(url) { 16 } else { 0 };
        Box::pin(async move {
            // Yielding lets every undelayed lookup settle first
            for _ in 0..stalls {
                tokio::task::yield_now().await;
            }
            outcome
        })
    }
}

/// Builds a session around a scripted resolver.
pub fn session_with(resolver: MockResolver) -> Session {
    Session::with_resolver(AmpifyOptions::default(), Box::new(resolver))
}

/// Counts resolver calls while building the session in one go.
pub fn counted_session(resolver: MockResolver) -> (Session, Arc<AtomicUsize>) {
    let calls = resolver.call_counter();
    (session_with(resolver), calls)
}
