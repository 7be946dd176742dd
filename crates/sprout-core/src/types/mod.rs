//! Core data types for Sprout dependency management.
//!
//! This module provides the fundamental types used throughout Sprout:
//! - Dependency coordinates parsed from manifest keys
//! - Dependency sets mapping coordinates to versions
//! - Release-version rules and version change records

pub mod coordinate;
pub mod dependency;
pub mod version;

// Re-export all public types
pub use coordinate::DependencyCoordinate;
pub use dependency::DependencySet;
pub use version::{is_release, is_update, VersionChange};
