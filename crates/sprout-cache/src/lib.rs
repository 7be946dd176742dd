//! Classpath cache for Sprout
//!
//! This crate avoids re-running the external build tool when the declared
//! dependencies have not changed. The resolved classpath is stored beside a
//! Blake3 fingerprint of the dependency set and served back while the
//! fingerprint still matches.

pub mod descriptor;
pub mod store;
pub mod tool;

// Re-export main types
pub use descriptor::{render_project_file, DescriptorGuard};
pub use store::{CacheRecord, CacheStatus, ResolutionCache, FINGERPRINT_FILE, VALUE_FILE};
pub use tool::{BuildTool, LeinTool};

use sprout_core::error::SproutError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, SproutError>;
