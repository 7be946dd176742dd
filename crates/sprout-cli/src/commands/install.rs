//! `sprout install` command implementation.
//!
//! Resolves the dependency classpath through Leiningen and caches it in the
//! project's temp directory.

use std::time::Instant;

use sprout_cache::{CacheStatus, ResolutionCache};
use sprout_core::error::SproutResult;

use super::launch::{project_classpath, CLASSPATH_SEPARATOR};
use super::CommandContext;

/// Execute the `sprout install` command
pub async fn execute(force: bool, ctx: &CommandContext) -> SproutResult<()> {
    let start_time = Instant::now();
    let store = ctx.manifest().await?;
    let deps = ctx.dependencies(&store)?;
    let cache = ResolutionCache::new(store.tempdir_path()?);

    if ctx.settings.dry_run {
        let status = cache.status(&deps).await?;
        ctx.output.line(&describe_status(&status, force));
        return Ok(());
    }

    if force {
        ctx.output.step("🧹", "Discarding cached classpath");
        cache.invalidate().await?;
    }

    ctx.output.step("📦", &format!("Resolving {} dependencies", deps.len()));
    let classpath = project_classpath(ctx, &store).await?;

    ctx.output.success(&format!(
        "Classpath ready ({} entries) in {:.2}s",
        classpath_entries(&classpath),
        start_time.elapsed().as_secs_f64()
    ));
    Ok(())
}

fn describe_status(status: &CacheStatus, force: bool) -> String {
    match status {
        CacheStatus::Hit(classpath) if !force => format!(
            "Classpath is up to date ({} entries)",
            classpath_entries(classpath)
        ),
        CacheStatus::Hit(_) => "Classpath is up to date, would resolve again".to_string(),
        CacheStatus::Stale => "Dependencies changed, would resolve the classpath".to_string(),
        CacheStatus::Miss => "No cached classpath, would resolve it".to_string(),
    }
}

/// Number of path entries in a separator-joined classpath
pub fn classpath_entries(classpath: &str) -> usize {
    classpath
        .split(CLASSPATH_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classpath_entries() {
        assert_eq!(classpath_entries(""), 0);
        assert_eq!(classpath_entries("/m2/a.jar"), 1);
        let joined = ["/m2/a.jar", "/m2/b.jar", "", ""].join(CLASSPATH_SEPARATOR);
        assert_eq!(classpath_entries(&joined), 2);
    }

    #[test]
    fn test_describe_status() {
        let hit = CacheStatus::Hit(["a.jar", "b.jar"].join(CLASSPATH_SEPARATOR));
        assert_eq!(describe_status(&hit, false), "Classpath is up to date (2 entries)");
        assert!(describe_status(&hit, true).contains("would resolve again"));
        assert!(describe_status(&CacheStatus::Miss, false).starts_with("No cached classpath"));
    }
}
