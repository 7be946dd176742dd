//! External build tool contract

use std::future::Future;
use std::process::Stdio;

use camino::Utf8Path;
use sprout_core::error::SproutError;
use tokio::process::Command;
use tracing::debug;

use crate::CacheResult;

/// A build tool able to turn a project descriptor into a classpath
pub trait BuildTool {
    /// Name used in error messages
    fn name(&self) -> &str;

    /// Resolve the dependencies of the project in `project_dir` and return
    /// the classpath it prints
    fn classpath(&self, project_dir: &Utf8Path) -> impl Future<Output = CacheResult<String>> + Send;
}

/// Leiningen, invoked as `lein classpath`
#[derive(Debug, Clone)]
pub struct LeinTool {
    program: String,
}

impl LeinTool {
    /// Run `lein` from `PATH`
    pub fn new() -> Self {
        Self::with_program("lein")
    }

    /// Run a specific Leiningen executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for LeinTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildTool for LeinTool {
    fn name(&self) -> &str {
        &self.program
    }

    fn classpath(&self, project_dir: &Utf8Path) -> impl Future<Output = CacheResult<String>> + Send {
        async move {
            debug!("Running {} classpath in {}", self.program, project_dir);

            let output = Command::new(&self.program)
                .arg("classpath")
                .current_dir(project_dir)
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| SproutError::ExternalToolFailure {
                    tool: self.program.clone(),
                    message: format!("failed to start: {}", e),
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(SproutError::ExternalToolFailure {
                    tool: self.program.clone(),
                    message: format!("exited with {}: {}", output.status, stderr.trim()),
                });
            }

            // The classpath is the last line; dependency download chatter may precede it
            let stdout = String::from_utf8_lossy(&output.stdout);
            stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .last()
                .map(str::to_string)
                .ok_or_else(|| SproutError::ExternalToolFailure {
                    tool: self.program.clone(),
                    message: "printed no classpath".to_string(),
                })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::tempdir;

    /// `sh classpath` runs a script named `classpath` in the project dir,
    /// which stands in for Leiningen
    async fn fake_lein(script: &str) -> (tempfile::TempDir, Utf8PathBuf, LeinTool) {
        let temp_dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        tokio::fs::write(root.join("classpath"), script).await.unwrap();
        (temp_dir, root, LeinTool::with_program("sh"))
    }

    #[tokio::test]
    async fn test_classpath_is_last_stdout_line() {
        let (_temp_dir, root, tool) =
            fake_lein("echo 'Retrieving lib.jar'\necho '/m2/a.jar:/m2/b.jar'\necho ''\n").await;

        let classpath = tool.classpath(&root).await.unwrap();
        assert_eq!(classpath, "/m2/a.jar:/m2/b.jar");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_tool_failure() {
        let (_temp_dir, root, tool) = fake_lein("echo 'Could not find artifact' >&2\nexit 3\n").await;

        match tool.classpath(&root).await {
            Err(SproutError::ExternalToolFailure { tool, message }) => {
                assert_eq!(tool, "sh");
                assert!(message.contains("Could not find artifact"));
            }
            other => panic!("Expected ExternalToolFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_output_is_tool_failure() {
        let (_temp_dir, root, tool) = fake_lein("exit 0\n").await;
        assert!(matches!(
            tool.classpath(&root).await,
            Err(SproutError::ExternalToolFailure { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let temp_dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let tool = LeinTool::with_program("sprout-no-such-lein");

        match tool.classpath(&root).await {
            Err(SproutError::ExternalToolFailure { message, .. }) => {
                assert!(message.contains("failed to start"))
            }
            other => panic!("Expected ExternalToolFailure, got {:?}", other),
        }
    }
}
