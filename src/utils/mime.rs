//! MIME types for emitted assets.

/// Minified script bundles and their source maps.
pub const JAVASCRIPT: &str = "application/javascript";

/// Compiled stylesheet bundles.
pub const CSS: &str = "text/css";

/// Manifest records.
pub const PLAIN: &str = "text/plain";
