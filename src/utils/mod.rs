//! # Utility module
//!
//! Small helpers shared across the crate:
//!
//! - `url` - URL validity checks used before any network work

pub mod url;

// Re-export commonly used items for convenience
pub use url::is_fetchable_url;
