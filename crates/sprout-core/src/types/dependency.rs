//! Dependency set type.
//!
//! Maps coordinates to the version strings declared in the manifest. The
//! set is unordered; anything that needs a stable order sorts by key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::DependencyCoordinate;

/// Unordered mapping from coordinate to version string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySet {
    entries: HashMap<DependencyCoordinate, String>,
}

impl DependencySet {
    /// Create an empty dependency set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a coordinate's version, returning the previous one
    pub fn insert(&mut self, coord: DependencyCoordinate, version: impl Into<String>) -> Option<String> {
        self.entries.insert(coord, version.into())
    }

    /// Version declared for a coordinate
    pub fn get(&self, coord: &DependencyCoordinate) -> Option<&str> {
        self.entries.get(coord).map(String::as_str)
    }

    /// Remove a coordinate
    pub fn remove(&mut self, coord: &DependencyCoordinate) -> Option<String> {
        self.entries.remove(coord)
    }

    pub fn contains(&self, coord: &DependencyCoordinate) -> bool {
        self.entries.contains_key(coord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&DependencyCoordinate, &str)> {
        self.entries.iter().map(|(coord, version)| (coord, version.as_str()))
    }

    /// All coordinates, in arbitrary order
    pub fn coordinates(&self) -> impl Iterator<Item = &DependencyCoordinate> {
        self.entries.keys()
    }

    /// Entries sorted lexicographically by their display key
    pub fn sorted(&self) -> Vec<(String, &str)> {
        let mut pairs: Vec<(String, &str)> = self
            .entries
            .iter()
            .map(|(coord, version)| (coord.to_string(), version.as_str()))
            .collect();
        pairs.sort();
        pairs
    }

    /// Add every entry of `other`, replacing versions already present
    pub fn extend(&mut self, other: DependencySet) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(DependencyCoordinate, String)> for DependencySet {
    fn from_iter<I: IntoIterator<Item = (DependencyCoordinate, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DependencySet {
    type Item = (DependencyCoordinate, String);
    type IntoIter = std::collections::hash_map::IntoIter<DependencyCoordinate, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(key: &str) -> DependencyCoordinate {
        DependencyCoordinate::parse(key).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut set = DependencySet::new();
        assert!(set.is_empty());

        assert_eq!(set.insert(coord("org.example/lib"), "1.0.0"), None);
        assert_eq!(set.insert(coord("org.example/lib"), "1.1.0"), Some("1.0.0".to_string()));
        assert_eq!(set.get(&coord("org.example/lib")), Some("1.1.0"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sorted_by_display_key() {
        let set: DependencySet = vec![
            (coord("reagent"), "1.2.0".to_string()),
            (coord("org.clojure/clojurescript"), "1.11.132".to_string()),
            (coord("cider/cider-nrepl"), "0.44.0".to_string()),
        ]
        .into_iter()
        .collect();

        let keys: Vec<String> = set.sorted().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["cider/cider-nrepl", "org.clojure/clojurescript", "reagent"]);
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"org.example/lib": "1.0.0", "reagent": "1.2.0"}"#;
        let set: DependencySet = serde_json::from_str(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&coord("reagent/reagent")), Some("1.2.0"));

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(value["org.example/lib"], "1.0.0");
    }

    #[test]
    fn test_rejects_bad_key() {
        let json = r#"{"a/b/c": "1.0.0"}"#;
        assert!(serde_json::from_str::<DependencySet>(json).is_err());
    }
}
