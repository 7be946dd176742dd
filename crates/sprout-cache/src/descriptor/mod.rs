//! Transient Leiningen project descriptor
//!
//! The build tool only understands its own project format, so a throwaway
//! `project.clj` listing the dependencies is written before each run and
//! removed afterwards.

use camino::{Utf8Path, Utf8PathBuf};
use sprout_core::error::SproutError;
use sprout_core::types::DependencySet;
use tracing::{debug, warn};

use crate::CacheResult;

/// Render a `project.clj` declaring `deps`, sorted by coordinate
pub fn render_project_file(deps: &DependencySet) -> String {
    let entries: Vec<String> = deps
        .sorted()
        .into_iter()
        .map(|(key, version)| format!("[{} {}]", key, clojure_string(version)))
        .collect();

    let mut out = String::from("(defproject sprout-classpath \"0.0.0-SNAPSHOT\"\n");
    out.push_str("  :dependencies [");
    out.push_str(&entries.join("\n                 "));
    out.push_str("])\n");
    out
}

fn clojure_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// A written descriptor file that is deleted when the guard drops
#[derive(Debug)]
pub struct DescriptorGuard {
    path: Utf8PathBuf,
}

impl DescriptorGuard {
    /// Write `contents` to `path`, creating parent directories
    pub async fn write(path: &Utf8Path, contents: &str) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SproutError::io(format!("Failed to create {}", parent), e))?;
        }

        tokio::fs::write(path, contents)
            .await
            .map_err(|e| SproutError::io(format!("Failed to write {}", path), e))?;
        debug!("Wrote project descriptor {}", path);

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for DescriptorGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed project descriptor {}", self.path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove {}: {}", self.path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprout_core::types::DependencyCoordinate;
    use tempfile::tempdir;

    #[test]
    fn test_render_sorted_dependencies() {
        let deps: DependencySet = vec![
            (DependencyCoordinate::parse("reagent").unwrap(), "1.2.0".to_string()),
            (DependencyCoordinate::parse("org.clojure/clojurescript").unwrap(), "1.11.132".to_string()),
        ]
        .into_iter()
        .collect();

        let rendered = render_project_file(&deps);
        assert_eq!(
            rendered,
            "(defproject sprout-classpath \"0.0.0-SNAPSHOT\"\n  \
             :dependencies [[org.clojure/clojurescript \"1.11.132\"]\n                 \
             [reagent \"1.2.0\"]])\n"
        );
    }

    #[test]
    fn test_render_empty() {
        let rendered = render_project_file(&DependencySet::new());
        assert!(rendered.contains(":dependencies []"));
    }

    #[test]
    fn test_versions_are_escaped() {
        let deps: DependencySet = vec![(
            DependencyCoordinate::parse("odd").unwrap(),
            "1.0\"]".to_string(),
        )]
        .into_iter()
        .collect();

        assert!(render_project_file(&deps).contains("[odd \"1.0\\\"]\"]"));
    }

    #[tokio::test]
    async fn test_guard_removes_file_on_drop() {
        let temp_dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let path = root.join("nested").join("project.clj");

        let guard = DescriptorGuard::write(&path, "(defproject x \"0\")").await.unwrap();
        assert!(path.exists());
        assert_eq!(guard.path(), path.as_path());

        drop(guard);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_guard_tolerates_missing_file() {
        let temp_dir = tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let path = root.join("project.clj");

        let guard = DescriptorGuard::write(&path, "").await.unwrap();
        std::fs::remove_file(&path).unwrap();
        drop(guard);
    }
}
