//! HTTP client for registry search endpoints

use std::time::Duration;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::debug;
use url::Url;

use sprout_core::error::SproutError;
use sprout_core::types::DependencyCoordinate;
use crate::api::{ClojarsSearchResponse, MavenSearchResponse};
use crate::RegistryResult;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Search protocol spoken by a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// clojars.org search API
    Clojars,
    /// search.maven.org Solr API
    MavenCentral,
}

/// A registry to query, identified by protocol and base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEndpoint {
    pub kind: RegistryKind,
    pub base_url: String,
}

impl RegistryEndpoint {
    /// The public Clojars registry
    pub fn clojars() -> Self {
        Self {
            kind: RegistryKind::Clojars,
            base_url: "https://clojars.org".to_string(),
        }
    }

    /// The public Maven Central search service
    pub fn maven_central() -> Self {
        Self {
            kind: RegistryKind::MavenCentral,
            base_url: "https://search.maven.org".to_string(),
        }
    }

    /// Point this endpoint at another host (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Human-readable registry name
    pub fn name(&self) -> &'static str {
        match self.kind {
            RegistryKind::Clojars => "Clojars",
            RegistryKind::MavenCentral => "Maven Central",
        }
    }

    /// Build the search URL for a coordinate
    pub fn query_url(&self, coord: &DependencyCoordinate) -> RegistryResult<Url> {
        let base = self.base_url.trim_end_matches('/');
        let url = match self.kind {
            RegistryKind::Clojars => Url::parse_with_params(
                &format!("{}/search", base),
                &[("q", coord.artifact()), ("format", "json")],
            ),
            RegistryKind::MavenCentral => {
                let query = format!("g:\"{}\" AND a:\"{}\"", coord.group(), coord.artifact());
                Url::parse_with_params(
                    &format!("{}/solrsearch/select", base),
                    &[
                        ("q", query.as_str()),
                        ("core", "gav"),
                        ("rows", "20"),
                        ("wt", "json"),
                    ],
                )
            }
        };

        url.map_err(|e| SproutError::ConfigValidation {
            field: "registry".to_string(),
            reason: format!("Invalid {} URL '{}': {}", self.name(), self.base_url, e),
        })
    }
}

/// HTTP client shared by all registry queries
#[derive(Debug, Clone)]
pub struct RegistryClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Per-request timeout
    timeout: Duration,
}

impl RegistryClient {
    /// Create a client with the default timeout
    pub fn new() -> RegistryResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(timeout)
            .timeout(timeout)
            .gzip(true)
            .user_agent(concat!("sprout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SproutError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self { client, timeout })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query one registry for the versions of `coord`.
    ///
    /// A 404 means the registry does not know the artifact and yields an
    /// empty list. The body is parsed only once it has been fully received.
    pub async fn fetch_candidates(
        &self,
        endpoint: &RegistryEndpoint,
        coord: &DependencyCoordinate,
    ) -> RegistryResult<Vec<String>> {
        let url = endpoint.query_url(coord)?;
        debug!("Querying {} for {}: {}", endpoint.name(), coord, url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, coord, e))?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Ok(Vec::new()),
            status => {
                return Err(SproutError::Network {
                    message: format!("{} returned status {} for {}", endpoint.name(), status, coord),
                    source: None,
                })
            }
        }

        let candidates = match endpoint.kind {
            RegistryKind::Clojars => response
                .json::<ClojarsSearchResponse>()
                .await
                .map_err(|e| self.transport_error(endpoint, coord, e))?
                .candidates(coord),
            RegistryKind::MavenCentral => response
                .json::<MavenSearchResponse>()
                .await
                .map_err(|e| self.transport_error(endpoint, coord, e))?
                .candidates(coord),
        };

        debug!("{} returned {} candidate(s) for {}", endpoint.name(), candidates.len(), coord);
        Ok(candidates)
    }

    fn transport_error(
        &self,
        endpoint: &RegistryEndpoint,
        coord: &DependencyCoordinate,
        error: reqwest::Error,
    ) -> SproutError {
        let message = if error.is_timeout() {
            format!(
                "{} timed out after {}s looking up {}",
                endpoint.name(),
                self.timeout.as_secs(),
                coord
            )
        } else if error.is_decode() {
            format!("Failed to parse {} response for {}: {}", endpoint.name(), coord, error)
        } else {
            format!("Failed to query {} for {}: {}", endpoint.name(), coord, error)
        };
        SproutError::network(message, error)
    }
}

#[cfg(test)]
mod tests;
