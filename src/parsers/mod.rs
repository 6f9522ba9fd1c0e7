//! Parsing side of the conversion: HTML trees and image byte formats.

pub mod html;
pub mod image;

// Re-export commonly used items for convenience
pub use html::{html_to_nodes, nodes_to_html, walk};
pub use image::sniff_dimensions;
