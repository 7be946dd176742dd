//! Manifest handling for Sprout
//!
//! This crate loads the `"cljs"` section of a project's `package.json`,
//! merges it over the built-in defaults and writes updates back to the
//! file, providing one validated configuration view for the other crates.

pub mod manifest;
pub mod merge;
pub mod store;

// Re-export main types
pub use manifest::{ManifestConfig, MANIFEST_FILE, SECTION};
pub use merge::{deep_merge, merge_at_path};
pub use store::ManifestStore;

use sprout_core::error::SproutError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, SproutError>;
