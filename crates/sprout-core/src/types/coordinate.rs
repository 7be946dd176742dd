//! Dependency coordinate type.
//!
//! A coordinate names a published artifact by group and artifact id, the
//! way Clojars and Maven Central address them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SproutError;

/// A `(group, artifact)` pair identifying a published package.
///
/// Parsed from a manifest key `"group/artifact"`. A bare `"name"` means
/// `name/name`, and such coordinates display back in the short form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DependencyCoordinate {
    group: String,
    artifact: String,
}

impl DependencyCoordinate {
    /// Create a coordinate from explicit group and artifact ids
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Parse a manifest key
    pub fn parse(key: &str) -> Result<Self, SproutError> {
        let invalid = |reason: &str| SproutError::ConfigValidation {
            field: format!("dependencies.{}", key),
            reason: reason.to_string(),
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(invalid("dependency name is empty"));
        }
        if key.chars().any(|c| c.is_whitespace() || c == '\0') {
            return Err(invalid("dependency name contains whitespace"));
        }

        let mut parts = key.splitn(2, '/');
        let group = parts.next().unwrap_or_default();
        let artifact = parts.next().unwrap_or(group);

        if group.is_empty() || artifact.is_empty() {
            return Err(invalid("expected 'group/artifact' or 'name'"));
        }
        if artifact.contains('/') {
            return Err(invalid("more than one '/' in dependency name"));
        }

        Ok(Self::new(group, artifact))
    }

    /// Group id
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Artifact id
    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Whether this coordinate names `group/artifact`
    pub fn matches(&self, group: &str, artifact: &str) -> bool {
        self.group == group && self.artifact == artifact
    }
}

impl fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group == self.artifact {
            write!(f, "{}", self.group)
        } else {
            write!(f, "{}/{}", self.group, self.artifact)
        }
    }
}

impl FromStr for DependencyCoordinate {
    type Err = SproutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DependencyCoordinate {
    type Error = SproutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DependencyCoordinate> for String {
    fn from(coord: DependencyCoordinate) -> Self {
        coord.to_string()
    }
}
