//! Command implementations and dispatch logic.
//!
//! Each command is an async function taking the shared `CommandContext`.

use camino::Utf8PathBuf;
use sprout_config::ManifestStore;
use sprout_core::error::{SproutError, SproutResult};
use sprout_core::types::{DependencyCoordinate, DependencySet};
use sprout_registry::{CancelSignal, RegistryClient, RegistryEndpoint, RegistryResolver};
use tracing::info;

pub mod build;
pub mod init;
pub mod install;
pub mod launch;
pub mod nrepl;
pub mod repl;
pub mod update;
pub mod watch;


use crate::{output::OutputHandler, Commands, Settings};

/// Middleware dependencies added by `--cider`, unless the manifest pins them
pub const CIDER_DEPENDENCIES: &[(&str, &str)] = &[
    ("cider/cider-nrepl", "0.50.2"),
    ("refactor-nrepl", "3.10.0"),
];

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    pub settings: Settings,
    pub cancel: CancelSignal,
}

impl CommandContext {
    /// Context rooted in the current directory
    pub fn new(settings: Settings, cancel: CancelSignal) -> SproutResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SproutError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| SproutError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("{} is not valid UTF-8", path.display()),
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            settings,
            cancel,
        })
    }

    /// Open the project manifest
    pub async fn manifest(&self) -> SproutResult<ManifestStore> {
        ManifestStore::open(&self.cwd).await
    }

    /// Registry resolver built from the registry settings
    pub fn resolver(&self) -> SproutResult<RegistryResolver> {
        let client = RegistryClient::with_timeout(self.settings.registry_timeout())?;
        Ok(RegistryResolver::with_registries(
            client,
            vec![
                RegistryEndpoint::clojars().with_base_url(&self.settings.clojars_url),
                RegistryEndpoint::maven_central().with_base_url(&self.settings.maven_url),
            ],
        ))
    }

    /// Declared dependencies, plus the CIDER set when `--cider` is given
    pub fn dependencies(&self, store: &ManifestStore) -> SproutResult<DependencySet> {
        let mut deps = store.config().dependencies().clone();
        if self.settings.cider {
            for (key, version) in CIDER_DEPENDENCIES {
                let coord = DependencyCoordinate::parse(key)?;
                if !deps.contains(&coord) {
                    deps.insert(coord, *version);
                }
            }
        }
        Ok(deps)
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> SproutResult<()> {
    info!("Running {:?} (dry run: {})", command, ctx.settings.dry_run);
    match command {
        Commands::Build => build::execute(ctx).await,
        Commands::Watch => watch::execute(ctx).await,
        Commands::Repl => repl::execute(ctx).await,
        Commands::Nrepl => nrepl::execute(ctx).await,
        Commands::Install { force } => install::execute(force, ctx).await,
        Commands::Init => init::execute(ctx).await,
        Commands::Update => update::execute(ctx).await,
    }
}
