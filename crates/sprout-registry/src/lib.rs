//! Registry version lookup for Sprout
//!
//! This crate queries Clojars and Maven Central for the published versions
//! of a dependency coordinate, applies release filtering and resolves whole
//! dependency sets concurrently with per-request timeouts and cancellation.

pub mod api;
pub mod cancel;
pub mod client;
pub mod resolver;

// Re-export main types
pub use api::{ClojarsArtifact, ClojarsSearchResponse, MavenDoc, MavenSearchResponse};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use client::{RegistryClient, RegistryEndpoint, RegistryKind, DEFAULT_TIMEOUT};
pub use resolver::{plan_updates, select_candidate, RegistryResolver};

use sprout_core::error::SproutError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, SproutError>;
