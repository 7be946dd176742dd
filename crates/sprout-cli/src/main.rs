//! # sprout-cli
//!
//! ClojureScript build and REPL launcher.
//!
//! This is the entry point for the `sprout` binary. It parses arguments, sets
//! up logging, dispatches to the command handlers and turns any error into a
//! formatted message and exit code.

use clap::{Args, Parser, Subcommand};
use sprout_core::error::{SproutError, SproutResult};
use sprout_registry::cancel_pair;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Build, watch and REPL launcher for ClojureScript projects
#[derive(Parser)]
#[command(
    name = "sprout",
    version,
    long_version = env!("SPROUT_LONG_VERSION"),
    about = "ClojureScript builds driven by package.json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub settings: Settings,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Only accept MAJOR.MINOR.PATCH(-BUILD) versions from registries
    #[arg(long, global = true)]
    pub releases_only: bool,

    /// Add the CIDER nREPL middleware dependencies
    #[arg(long, global = true)]
    pub cider: bool,

    /// Show what would happen without running or writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Primary registry
    #[arg(long, global = true, env = "SPROUT_CLOJARS_URL", default_value = "https://clojars.org")]
    pub clojars_url: String,

    /// Fallback registry
    #[arg(long, global = true, env = "SPROUT_MAVEN_URL", default_value = "https://search.maven.org")]
    pub maven_url: String,

    /// Registry request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "SPROUT_REGISTRY_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub registry_timeout: u64,

    /// Leiningen executable used to resolve the classpath
    #[arg(long, global = true, env = "SPROUT_LEIN", default_value = "lein")]
    pub lein: String,
}

impl Settings {
    pub fn registry_timeout(&self) -> Duration {
        Duration::from_secs(self.registry_timeout)
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Compile the project once (default)
    Build,
    /// Recompile whenever a source file changes
    Watch,
    /// Start a ClojureScript REPL
    Repl,
    /// Start an nREPL server
    Nrepl,
    /// Resolve and cache the dependency classpath
    Install {
        /// Ignore the cached classpath
        #[arg(long)]
        force: bool,
    },
    /// Create or complete package.json
    Init,
    /// Bump dependencies to their latest registry versions
    Update,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    debug!("Starting sprout v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::from(e.exit_code())
        }
    }
}

fn run_cli(cli: Cli) -> SproutResult<()> {
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| SproutError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let (cancel_handle, cancel) = cancel_pair();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, cancelling outstanding lookups");
                cancel_handle.cancel();
            }
        });

        let ctx = CommandContext::new(cli.settings, cancel)?;
        commands::dispatch_command(cli.command.unwrap_or(Commands::Build), &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sprout={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("sprout encountered an unexpected error: {}", panic_info);
        eprintln!("sprout crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
