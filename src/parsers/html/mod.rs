//! HTML parsing, traversal, and serialization.
//!
//! - `dom`: the owned node tree and fragment parsing
//! - `transformers`: per-element AMP rewrites
//! - `walker`: recursive traversal applying the transformers
//! - `serializer`: rendering the tree back to markup

pub mod dom;
pub mod serializer;
pub mod transformers;
pub mod walker;

// Re-export commonly used items for convenience
pub use dom::{html_to_nodes, Attr, Element, Node};
pub use serializer::nodes_to_html;
pub use walker::walk;
