//! Network side of the conversion: dimension lookups and their cache.

pub mod cache;
pub mod session;

// Re-export commonly used items for convenience
pub use cache::ImageSizeCache;
pub use session::{HttpResolver, ImageSizeResolver, Session};
