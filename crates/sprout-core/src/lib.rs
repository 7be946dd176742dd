//! # sprout-core
//!
//! Core types and utilities shared across all Sprout crates.
//!
//! This crate provides:
//! - DependencyCoordinate and DependencySet types for manifest dependencies
//! - Release-version rules used when picking registry candidates
//! - Fingerprint computation over a dependency set
//! - SproutError enum for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (coordinates, dependency sets, versions)
//! - `error`: Error types and result aliases
//! - `utils`: Hashing helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{SproutError, SproutResult};
pub use types::{DependencyCoordinate, DependencySet, VersionChange};
pub use utils::{fingerprint, Fingerprint};
