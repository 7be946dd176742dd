//! `sprout init` command implementation.
//!
//! Creates `package.json` with a `"cljs"` section, or fills in the parts of
//! an existing section that are missing, and seeds a source directory.

use camino::Utf8PathBuf;
use serde_json::{json, Map, Value};
use sprout_config::{manifest, ManifestStore, MANIFEST_FILE, SECTION};
use sprout_core::error::{SproutError, SproutResult};
use sprout_core::types::DependencyCoordinate;

use super::CommandContext;

/// Entry namespace for new projects
pub const DEFAULT_MAIN: &str = "core";

/// The compiler every project depends on
pub fn clojurescript() -> DependencyCoordinate {
    DependencyCoordinate::new("org.clojure", "clojurescript")
}

/// Execute the `sprout init` command
pub async fn execute(ctx: &CommandContext) -> SproutResult<()> {
    if ctx.cwd.join(MANIFEST_FILE).exists() {
        complete_existing(ctx).await
    } else {
        create_new(ctx).await
    }
}

async fn create_new(ctx: &CommandContext) -> SproutResult<()> {
    ctx.output.step("🌱", &format!("Creating {}", MANIFEST_FILE));

    let mut section = Map::new();
    section.insert(manifest::SRC.to_string(), Value::from("src"));
    section.insert(manifest::MAIN.to_string(), Value::from(DEFAULT_MAIN));

    let mut dependencies = Map::new();
    if let Some(version) = latest_clojurescript(ctx).await? {
        dependencies.insert(clojurescript().to_string(), Value::from(version));
    }
    section.insert(manifest::DEPENDENCIES.to_string(), Value::Object(dependencies));

    let document = json!({ SECTION: section });

    if ctx.settings.dry_run {
        ctx.output.line(&pretty(&document)?);
        return Ok(());
    }

    let store = ManifestStore::create(&ctx.cwd, &document).await?;
    seed_sources(&store, ctx).await?;

    ctx.output.success("Initialized sprout project");
    ctx.output.info("Next steps:");
    ctx.output.info("  sprout install");
    ctx.output.info("  sprout repl");
    Ok(())
}

async fn complete_existing(ctx: &CommandContext) -> SproutResult<()> {
    let mut store = ctx.manifest().await?;

    let mut patch = Map::new();
    if store.config().main().is_err() {
        patch.insert(manifest::MAIN.to_string(), Value::from(DEFAULT_MAIN));
    }
    if !store.config().dependencies().contains(&clojurescript()) {
        if let Some(version) = latest_clojurescript(ctx).await? {
            patch.insert(
                manifest::DEPENDENCIES.to_string(),
                json!({ clojurescript().to_string(): version }),
            );
        }
    }

    if patch.is_empty() {
        ctx.output.info(&format!("{} is already initialized", MANIFEST_FILE));
        return Ok(());
    }

    if ctx.settings.dry_run {
        ctx.output.line(&pretty(&json!({ SECTION: patch }))?);
        return Ok(());
    }

    store.update(&[SECTION], Value::Object(patch)).await?;
    seed_sources(&store, ctx).await?;

    ctx.output.success(&format!("Updated {}", store.path()));
    Ok(())
}

async fn latest_clojurescript(ctx: &CommandContext) -> SproutResult<Option<String>> {
    let resolver = ctx.resolver()?;
    let version = ctx
        .cancel
        .guard(resolver.resolve_one(&clojurescript(), ctx.settings.releases_only))
        .await?;

    if version.is_none() {
        ctx.output.warn(&format!(
            "No published version of {} found, add it to \"dependencies\" by hand",
            clojurescript()
        ));
    }
    Ok(version)
}

/// Create the source directory with a starter namespace when it is absent
async fn seed_sources(store: &ManifestStore, ctx: &CommandContext) -> SproutResult<()> {
    let config = store.config();
    let src_dir = store.project_path(config.src()?);
    if src_dir.exists() {
        return Ok(());
    }

    let main = config.main()?;
    let main_file = src_dir.join(namespace_path(main));
    if let Some(parent) = main_file.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SproutError::io(format!("Failed to create {}", parent), e))?;
    }

    let contents = format!("(ns {})\n\n(println \"Hello from {}\")\n", main, main);
    tokio::fs::write(&main_file, contents)
        .await
        .map_err(|e| SproutError::io(format!("Failed to write {}", main_file), e))?;

    ctx.output.step("📁", &format!("Created {}", main_file));
    Ok(())
}

/// `my-app.core` lives in `my_app/core.cljs`
pub fn namespace_path(namespace: &str) -> Utf8PathBuf {
    let mut path: Utf8PathBuf = namespace
        .split('.')
        .map(|segment| segment.replace('-', "_"))
        .collect();
    path.set_extension("cljs");
    path
}

fn pretty(document: &Value) -> SproutResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| SproutError::JsonParse {
        message: e.to_string(),
    })
}
