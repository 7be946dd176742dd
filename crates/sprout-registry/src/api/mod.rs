//! Registry search API response types

use serde::{Deserialize, Serialize};
use sprout_core::types::DependencyCoordinate;

/// Search response from Clojars (`/search?format=json`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClojarsSearchResponse {
    /// Matching jars, in Clojars' ranking
    #[serde(default)]
    pub results: Vec<ClojarsArtifact>,
    /// Total number of hits
    #[serde(default)]
    pub count: Option<u64>,
}

/// One jar in a Clojars search result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClojarsArtifact {
    /// Group id
    pub group_name: String,
    /// Artifact id
    pub jar_name: String,
    /// Latest version
    pub version: String,
    /// Jar description
    #[serde(default)]
    pub description: Option<String>,
}

/// Search response from Maven Central (`/solrsearch/select?wt=json`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MavenSearchResponse {
    pub response: MavenResponseBody,
}

/// Solr result body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MavenResponseBody {
    /// Total number of hits
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    /// Matching artifact versions, newest first
    #[serde(default)]
    pub docs: Vec<MavenDoc>,
}

/// One artifact version in a Maven Central search result
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MavenDoc {
    /// Group id
    pub g: String,
    /// Artifact id
    pub a: String,
    /// Version
    pub v: String,
}

impl ClojarsSearchResponse {
    /// Versions of exactly `coord`, in registry order
    pub fn candidates(self, coord: &DependencyCoordinate) -> Vec<String> {
        self.results
            .into_iter()
            .filter(|jar| coord.matches(&jar.group_name, &jar.jar_name))
            .map(|jar| jar.version)
            .collect()
    }
}

impl MavenSearchResponse {
    /// Versions of exactly `coord`, in registry order
    pub fn candidates(self, coord: &DependencyCoordinate) -> Vec<String> {
        self.response
            .docs
            .into_iter()
            .filter(|doc| coord.matches(&doc.g, &doc.a))
            .map(|doc| doc.v)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clojars_candidates_filter_other_jars() {
        let body = serde_json::json!({
            "count": 3,
            "results": [
                { "group_name": "reagent-utils", "jar_name": "reagent-utils", "version": "0.3.8" },
                { "group_name": "reagent", "jar_name": "reagent", "version": "1.2.0", "description": "React" },
                { "group_name": "reagent", "jar_name": "reagent", "version": "1.1.1" }
            ]
        });

        let response: ClojarsSearchResponse = serde_json::from_value(body).unwrap();
        let coord = DependencyCoordinate::parse("reagent").unwrap();
        assert_eq!(response.candidates(&coord), vec!["1.2.0", "1.1.1"]);
    }

    #[test]
    fn test_maven_candidates_keep_order() {
        let body = serde_json::json!({
            "responseHeader": { "status": 0 },
            "response": {
                "numFound": 3,
                "docs": [
                    { "id": "org.example:lib:2.0.0-rc1", "g": "org.example", "a": "lib", "v": "2.0.0-rc1" },
                    { "id": "org.example:lib:1.1.0", "g": "org.example", "a": "lib", "v": "1.1.0" },
                    { "id": "org.example:lib-extra:9.0.0", "g": "org.example", "a": "lib-extra", "v": "9.0.0" }
                ]
            }
        });

        let response: MavenSearchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.response.num_found, 3);
        let coord = DependencyCoordinate::parse("org.example/lib").unwrap();
        assert_eq!(response.candidates(&coord), vec!["2.0.0-rc1", "1.1.0"]);
    }

    #[test]
    fn test_empty_responses() {
        let clojars: ClojarsSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(clojars.results.is_empty());

        let maven: MavenSearchResponse = serde_json::from_str(r#"{"response":{}}"#).unwrap();
        assert!(maven.response.docs.is_empty());
    }
}
