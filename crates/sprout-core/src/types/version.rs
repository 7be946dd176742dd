//! Release-version rules.
//!
//! Registry candidates are plain strings. The only structure Sprout cares
//! about is whether a version is a strict numeric release; update decisions
//! compare strings, never semantic ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DependencyCoordinate;

/// Check whether `version` is `MAJOR.MINOR.PATCH` with an optional
/// numeric `-BUILD` suffix.
pub fn is_release(version: &str) -> bool {
    let (core, build) = match version.split_once('-') {
        Some((core, build)) => (core, Some(build)),
        None => (version, None),
    };

    let mut components = 0;
    for part in core.split('.') {
        if !is_numeric(part) {
            return false;
        }
        components += 1;
    }

    components == 3 && build.map_or(true, is_numeric)
}

/// Whether moving from `current` to `candidate` counts as an update
pub fn is_update(current: &str, candidate: &str) -> bool {
    current != candidate
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// A coordinate whose latest known version differs from the declared one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChange {
    pub coordinate: DependencyCoordinate,
    pub from: String,
    pub to: String,
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.coordinate, self.from, self.to)
    }
}
