//! Version resolution across fallback registries

use futures::future::join_all;
use tracing::{debug, warn};

use sprout_core::error::SproutError;
use sprout_core::types::{is_release, is_update, DependencyCoordinate, DependencySet, VersionChange};
use crate::cancel::CancelSignal;
use crate::client::{RegistryClient, RegistryEndpoint};
use crate::RegistryResult;

/// Resolves coordinates to their latest published version.
///
/// Registries are consulted in priority order; a later registry is only
/// queried when every earlier one produced no acceptable candidate.
#[derive(Debug, Clone)]
pub struct RegistryResolver {
    client: RegistryClient,
    registries: Vec<RegistryEndpoint>,
}

impl RegistryResolver {
    /// Resolver over Clojars, falling back to Maven Central
    pub fn new(client: RegistryClient) -> Self {
        Self::with_registries(
            client,
            vec![RegistryEndpoint::clojars(), RegistryEndpoint::maven_central()],
        )
    }

    /// Resolver over custom registries, highest priority first
    pub fn with_registries(client: RegistryClient, registries: Vec<RegistryEndpoint>) -> Self {
        Self { client, registries }
    }

    pub fn registries(&self) -> &[RegistryEndpoint] {
        &self.registries
    }

    /// Find the best version of one coordinate.
    ///
    /// Returns `Ok(None)` when no registry has an acceptable candidate.
    /// Transport failures are errors.
    pub async fn resolve_one(
        &self,
        coord: &DependencyCoordinate,
        releases_only: bool,
    ) -> RegistryResult<Option<String>> {
        for endpoint in &self.registries {
            let candidates = self.client.fetch_candidates(endpoint, coord).await?;
            if let Some(version) = select_candidate(candidates, releases_only) {
                debug!("Resolved {} to {} via {}", coord, version, endpoint.name());
                return Ok(Some(version));
            }
        }

        let empty = SproutError::RegistryLookupEmpty {
            coordinate: coord.to_string(),
        };
        warn!("{}", empty);
        Ok(None)
    }

    /// Resolve many coordinates concurrently.
    ///
    /// Every lookup runs to completion (or until `cancel` fires). Coordinates
    /// without a match are left out of the result; the first transport
    /// error fails the batch once all lookups have settled.
    pub async fn resolve_many<I>(
        &self,
        coords: I,
        releases_only: bool,
        cancel: &CancelSignal,
    ) -> RegistryResult<DependencySet>
    where
        I: IntoIterator<Item = DependencyCoordinate>,
    {
        let lookups = coords.into_iter().map(|coord| async move {
            let result = cancel.guard(self.resolve_one(&coord, releases_only)).await;
            (coord, result)
        });

        let mut resolved = DependencySet::new();
        let mut failure = None;
        for (coord, result) in join_all(lookups).await {
            match result {
                Ok(Some(version)) => {
                    resolved.insert(coord, version);
                }
                Ok(None) => debug!("Dropping {} from batch: no version found", coord),
                Err(e) => {
                    debug!("Lookup for {} failed: {}", coord, e);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(resolved),
        }
    }
}

/// Pick the first acceptable candidate in registry order
pub fn select_candidate(candidates: Vec<String>, releases_only: bool) -> Option<String> {
    candidates
        .into_iter()
        .find(|version| !releases_only || is_release(version))
}

/// Coordinates whose latest version differs from the declared one, sorted by key
pub fn plan_updates(current: &DependencySet, latest: &DependencySet) -> Vec<VersionChange> {
    let mut changes: Vec<VersionChange> = current
        .iter()
        .filter_map(|(coord, from)| {
            let to = latest.get(coord)?;
            is_update(from, to).then(|| VersionChange {
                coordinate: coord.clone(),
                from: from.to_string(),
                to: to.to_string(),
            })
        })
        .collect();

    changes.sort_by_key(|change| change.coordinate.to_string());
    changes
}
