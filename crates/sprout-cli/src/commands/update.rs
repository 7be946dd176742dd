//! `sprout update` command implementation.
//!
//! Looks up the latest version of every dependency and writes the changed
//! ones back to the manifest.

use serde_json::{Map, Value};
use sprout_config::manifest::DEPENDENCIES;
use sprout_config::{ManifestStore, SECTION};
use sprout_core::error::SproutResult;
use sprout_core::types::{DependencyCoordinate, VersionChange};
use sprout_registry::plan_updates;

use super::CommandContext;

/// Execute the `sprout update` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    let mut store = ctx.manifest().await?;
    let changes = plan(ctx, &store).await?;

    if changes.is_empty() {
        ctx.output.success("All dependencies are up to date");
        return Ok(());
    }

    for change in &changes {
        ctx.output.line(&change.to_string());
    }

    if ctx.settings.dry_run {
        ctx.output.info("Dry run, manifest left unchanged");
        return Ok(());
    }

    persist(&mut store, &changes).await?;
    ctx.output.success(&format!("Updated {} dependencies", changes.len()));
    Ok(())
}

/// Version changes between the declared and the latest published versions
pub async fn plan(ctx: &CommandContext, store: &ManifestStore) -> SproutResult<Vec<VersionChange>> {
    let current = ctx.dependencies(store)?;
    let resolver = ctx.resolver()?;

    ctx.output.step("🔍", &format!("Checking {} dependencies", current.len()));
    let latest = resolver
        .resolve_many(
            current.coordinates().cloned(),
            ctx.settings.releases_only,
            &ctx.cancel,
        )
        .await?;

    Ok(plan_updates(&current, &latest))
}

/// Write `changes` into the manifest's dependency map.
///
/// Entries keep the key spelling already used in the manifest, so
/// `"reagent/reagent"` is not duplicated as `"reagent"`.
pub async fn persist(store: &mut ManifestStore, changes: &[VersionChange]) -> SproutResult<()> {
    let declared: Vec<(String, DependencyCoordinate)> = match store.config().get(DEPENDENCIES) {
        Ok(Value::Object(map)) => map
            .keys()
            .filter_map(|key| Some((key.clone(), DependencyCoordinate::parse(key).ok()?)))
            .collect(),
        _ => Vec::new(),
    };

    let patch: Map<String, Value> = changes
        .iter()
        .map(|change| {
            let key = declared
                .iter()
                .find(|(_, coord)| *coord == change.coordinate)
                .map(|(key, _)| key.clone())
                .unwrap_or_else(|| change.coordinate.to_string());
            (key, Value::from(change.to.clone()))
        })
        .collect();

    store.update(&[SECTION, DEPENDENCIES], Value::Object(patch)).await
}
