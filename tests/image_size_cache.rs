//! Session cache behavior
//!
//! Dimension lookups are cached per session, including the failed ones,
//! and URLs that can never be fetched stay out of the cache entirely.

use std::sync::atomic::Ordering;

use ampify::core::{convert_with_session, ImageSizeFailure};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{counted_session, MockResolver};

/// Every occurrence of a source in a fragment shares one lookup.
#[tokio::test]
async fn repeated_sources_share_one_lookup() {
    let (session, calls) =
        counted_session(MockResolver::new().sized("https://example.com/a.jpg", 400, 300));
    let html = "<img src=\"https://example.com/a.jpg\">\
                <img src=\"https://example.com/a.jpg\">\
                <img src=\"https://example.com/a.jpg\">";

    let amp = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(amp.matches("<amp-img").count(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(session.cached_lookups(), 1);
}

/// A session carries its cache across conversions.
#[tokio::test]
async fn lookups_survive_across_conversions() {
    let (session, calls) =
        counted_session(MockResolver::new().sized("https://example.com/a.jpg", 400, 300));
    let html = "<img src=\"https://example.com/a.jpg\">";

    let first = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");
    let second = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Failures are cached too, so a broken source is only tried once.
#[tokio::test]
async fn failed_lookups_are_remembered() {
    let (session, calls) = counted_session(MockResolver::new().failing(
        "https://example.com/gone.jpg",
        ImageSizeFailure::NotFound("https://example.com/gone.jpg".to_string()),
    ));
    let html = "<img src=\"https://example.com/gone.jpg\">";

    let first = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");
    let second = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(first, html);
    assert_eq!(second, html);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Timeouts are remembered like any other outcome.
#[tokio::test]
async fn timed_out_lookups_are_remembered() {
    let (session, calls) = counted_session(MockResolver::new().failing(
        "https://example.com/slow.jpg",
        ImageSizeFailure::TimedOut("https://example.com/slow.jpg".to_string()),
    ));
    let html = "<img src=\"https://example.com/slow.jpg\">";

    convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");
    let amp = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(
        amp,
        "<amp-img src=\"https://example.com/slow.jpg\" width=\"600\" height=\"400\" \
         layout=\"responsive\"></amp-img>"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Sources that can never be fetched stay out of the cache.
#[tokio::test]
async fn unfetchable_sources_stay_out_of_the_cache() {
    let (session, calls) = counted_session(MockResolver::new());
    let html = "<img src=\"/relative/photo.jpg\">\
                <img src=\"//cdn.example.com/photo.jpg\">\
                <img src=\"data:image/png;base64,iVBORw0KGgo=\">";

    let amp = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(amp, html);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.cached_lookups(), 0);
}

/// Distinct sources resolve independently and fill separate cache slots.
#[tokio::test]
async fn distinct_sources_resolve_independently() {
    let (session, calls) = counted_session(
        MockResolver::new()
            .sized("https://example.com/a.jpg", 400, 300)
            .sized("https://example.com/b.jpg", 120, 80),
    );
    let html = "<img src=\"https://example.com/a.jpg\">\
                <img src=\"https://example.com/b.jpg\">";

    let amp = convert_with_session(html, &session)
        .await
        .expect("conversion should succeed");

    assert_eq!(
        amp,
        "<amp-img src=\"https://example.com/a.jpg\" width=\"400\" height=\"300\" \
         layout=\"responsive\"></amp-img>\
         <amp-img src=\"https://example.com/b.jpg\" width=\"120\" height=\"80\" \
         layout=\"fixed\"></amp-img>"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.cached_lookups(), 2);
}
