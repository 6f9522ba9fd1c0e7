//! Recursive traversal that applies the AMP transformers.

use futures::future::{join_all, BoxFuture};

use crate::network::session::Session;

use super::dom::Node;
use super::transformers;

/// Walks a node tree and rewrites every convertible element in place.
///
/// Siblings are processed concurrently, so a fragment with many images
/// issues its dimension lookups in parallel instead of one at a time.
pub async fn walk(session: &Session, nodes: &mut [Node]) {
    join_all(
        nodes
            .iter_mut()
            .map(|node| transform_node(session, node)),
    )
    .await;
}

fn transform_node<'a>(session: &'a Session, node: &'a mut Node) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        if let Node::Element(element) = node {
            let name = element.name.clone();

            match name.as_str() {
                // Without a usable source there is nothing to convert
                "img" | "iframe" if !element.has_attr_value("src") => {
                    tracing::debug!("skipping {} without a src attribute", name);
                }
                "img" => transformers::transform_img(session, element).await,
                "iframe" => transformers::transform_iframe(element),
                "audio" => transformers::transform_audio(element),
                _ => {}
            }

            walk(session, &mut element.children).await;
        }
    })
}
