//! # Ampify Library
//!
//! Converts regular HTML markup into valid [AMP HTML](https://amp.dev/).
//!
//! `img`, `iframe`, and `audio` elements become their `amp-` counterparts,
//! with real image dimensions fetched over HTTP and AMP layout attributes
//! filled in. Everything else passes through untouched.
//!
//! ## Module organization
//!
//! - `core` - options, errors, and the `convert` entry points
//! - `parsers` - HTML tree handling and image dimension sniffing
//! - `network` - dimension resolution and per-session caching
//! - `utils` - URL helpers
//!
//! ## Example
//!
//! ```rust,ignore
//! let amp = ampify::convert("<img src=\"https://example.com/a.jpg\">").await?;
//! ```

pub mod core;
pub mod network;
pub mod parsers;
pub mod utils;

// Re-export commonly used items for convenience
pub use core::*;
pub use network::*;
pub use parsers::*;
pub use utils::*;
