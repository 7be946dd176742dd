//! Java command lines for the compiler and REPLs.

use std::fmt;

use sprout_cache::{LeinTool, ResolutionCache};
use sprout_config::{ManifestConfig, ManifestStore};
use sprout_core::error::{SproutError, SproutResult};
use tracing::debug;

use super::CommandContext;

#[cfg(windows)]
pub const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const CLASSPATH_SEPARATOR: &str = ":";

/// What the launched JVM should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Build,
    Watch,
    Repl,
    Nrepl { cider: bool },
}

/// A `java` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl JavaCommand {
    /// Command line for `mode` with the given dependency classpath
    pub fn for_mode(mode: LaunchMode, config: &ManifestConfig, classpath: &str) -> SproutResult<Self> {
        let src = config.src()?;
        let full_classpath = if classpath.is_empty() {
            src.to_string()
        } else {
            format!("{}{}{}", src, CLASSPATH_SEPARATOR, classpath)
        };

        let mut args = vec!["-cp".to_string(), full_classpath];

        match mode {
            LaunchMode::Nrepl { cider } => {
                args.extend(
                    ["clojure.main", "-m", "nrepl.cmdline", "--bind"].map(String::from),
                );
                args.push(config.repl_host()?.to_string());
                args.push("--port".to_string());
                args.push(config.repl_port()?.to_string());
                if cider {
                    args.push("--middleware".to_string());
                    args.push(
                        "[cider.nrepl/cider-middleware refactor-nrepl.middleware/wrap-refactor]"
                            .to_string(),
                    );
                }
            }
            LaunchMode::Build | LaunchMode::Watch | LaunchMode::Repl => {
                let asset_path = config.asset_path()?;
                args.extend([
                    "cljs.main".to_string(),
                    "--output-dir".to_string(),
                    asset_path.to_string(),
                    "--output-to".to_string(),
                    config.target()?.to_string(),
                    "--compile-opts".to_string(),
                    format!("{{:asset-path \"{}\"}}", asset_path),
                ]);

                match mode {
                    LaunchMode::Watch => {
                        args.push("--watch".to_string());
                        args.push(src.to_string());
                    }
                    LaunchMode::Repl => {
                        args.push("--host".to_string());
                        args.push(config.repl_host()?.to_string());
                        args.push("--port".to_string());
                        args.push(config.repl_port()?.to_string());
                    }
                    _ => {
                        args.push("--optimizations".to_string());
                        args.push("advanced".to_string());
                    }
                }

                args.push("--compile".to_string());
                args.push(config.main()?.to_string());
                if mode == LaunchMode::Repl {
                    args.push("--repl".to_string());
                }
            }
        }

        Ok(Self {
            program: "java".to_string(),
            args,
        })
    }

    /// Run to completion in `dir`; a non-zero exit is an error
    pub async fn run(&self, dir: &camino::Utf8Path) -> SproutResult<()> {
        debug!("Launching {}", self);
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .status()
            .await
            .map_err(|e| SproutError::ExternalToolFailure {
                tool: self.program.clone(),
                message: format!("failed to start: {}", e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SproutError::ExternalToolFailure {
                tool: self.program.clone(),
                message: format!("exited with {}", status),
            })
        }
    }
}

impl fmt::Display for JavaCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
                write!(f, " '{}'", arg.replace('\'', "'\\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Cached classpath for the project's dependencies, resolving with
/// Leiningen on a miss
pub async fn project_classpath(ctx: &CommandContext, store: &ManifestStore) -> SproutResult<String> {
    let deps = ctx.dependencies(store)?;
    let cache = ResolutionCache::new(store.tempdir_path()?);
    let tool = LeinTool::with_program(&ctx.settings.lein);

    cache.classpath(&deps, &tool, &store.fake_project_path()?).await
}

/// Shared body of `build`, `watch`, `repl` and `nrepl`
pub async fn launch(mode: LaunchMode, ctx: &CommandContext) -> SproutResult<()> {
    let store = ctx.manifest().await?;
    // Fail on a missing entry point before resolving anything
    if !matches!(mode, LaunchMode::Nrepl { .. }) {
        store.config().main()?;
    }

    let classpath = project_classpath(ctx, &store).await?;
    let command = JavaCommand::for_mode(mode, store.config(), &classpath)?;

    if ctx.settings.dry_run {
        ctx.output.line(&command.to_string());
        return Ok(());
    }

    command.run(store.root()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(section: serde_json::Value) -> ManifestConfig {
        ManifestConfig::from_document(&json!({ "cljs": section })).unwrap()
    }

    #[test]
    fn test_build_command() {
        let command = JavaCommand::for_mode(
            LaunchMode::Build,
            &config(json!({ "main": "app.core" })),
            "/m2/cljs.jar",
        )
        .unwrap();
        let classpath = format!("src{}/m2/cljs.jar", CLASSPATH_SEPARATOR);

        assert_eq!(command.program, "java");
        assert_eq!(
            command.args,
            vec![
                "-cp",
                classpath.as_str(),
                "cljs.main",
                "--output-dir",
                "out",
                "--output-to",
                "out/main.js",
                "--compile-opts",
                "{:asset-path \"out\"}",
                "--optimizations",
                "advanced",
                "--compile",
                "app.core",
            ]
        );
    }

    #[test]
    fn test_watch_uses_src() {
        let command = JavaCommand::for_mode(
            LaunchMode::Watch,
            &config(json!({ "main": "app.core", "src": "cljs" })),
            "",
        )
        .unwrap();

        assert_eq!(command.args[1], "cljs");
        let watch = command.args.iter().position(|a| a == "--watch").unwrap();
        assert_eq!(command.args[watch + 1], "cljs");
        assert!(!command.args.contains(&"--optimizations".to_string()));
    }

    #[test]
    fn test_repl_uses_host_and_port() {
        let command = JavaCommand::for_mode(
            LaunchMode::Repl,
            &config(json!({ "main": "app.core", "replHost": "0.0.0.0", "replPort": "9000" })),
            "a.jar",
        )
        .unwrap();

        let line = command.to_string();
        assert!(line.contains("--host 0.0.0.0 --port 9000"));
        assert!(line.ends_with("--compile app.core --repl"));
    }

    #[test]
    fn test_nrepl_middleware_only_with_cider() {
        let cfg = config(json!({}));

        let plain = JavaCommand::for_mode(LaunchMode::Nrepl { cider: false }, &cfg, "a.jar").unwrap();
        assert!(plain.to_string().ends_with("nrepl.cmdline --bind localhost --port 5044"));

        let cider = JavaCommand::for_mode(LaunchMode::Nrepl { cider: true }, &cfg, "a.jar").unwrap();
        assert!(cider
            .to_string()
            .ends_with("--middleware '[cider.nrepl/cider-middleware refactor-nrepl.middleware/wrap-refactor]'"));
    }

    #[test]
    fn test_build_requires_main() {
        let result = JavaCommand::for_mode(LaunchMode::Build, &config(json!({})), "");
        assert!(matches!(result, Err(SproutError::ConfigKeyUndefined { .. })));
    }

    #[test]
    fn test_display_quotes_edn() {
        let command = JavaCommand {
            program: "java".to_string(),
            args: vec!["-co".to_string(), "{:asset-path \"out\"}".to_string()],
        };
        assert_eq!(command.to_string(), "java -co '{:asset-path \"out\"}'");
    }
}
