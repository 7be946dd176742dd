//! Manifest file access: load, reload and merge-write

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use sprout_core::error::SproutError;
use tracing::debug;

use crate::manifest::{parse_manifest, ManifestConfig, MANIFEST_FILE};
use crate::merge::merge_at_path;
use crate::ConfigResult;

/// Owner of the project manifest and its loaded configuration.
///
/// The configuration is loaded once when the store is opened and is only
/// refreshed by `update` or an explicit `reload`.
#[derive(Debug)]
pub struct ManifestStore {
    /// Project root directory
    root: Utf8PathBuf,
    /// Path to package.json
    path: Utf8PathBuf,
    /// Loaded configuration
    config: ManifestConfig,
}

impl ManifestStore {
    /// Open the manifest in `root`, failing with `ConfigMissing` if absent
    pub async fn open(root: impl AsRef<Utf8Path>) -> ConfigResult<Self> {
        let root = root.as_ref().to_path_buf();
        let path = root.join(MANIFEST_FILE);
        let config = load_config(&path).await?;

        Ok(Self { root, path, config })
    }

    /// Write a new manifest document and open it
    pub async fn create(root: impl AsRef<Utf8Path>, document: &Value) -> ConfigResult<Self> {
        let root = root.as_ref();
        let path = root.join(MANIFEST_FILE);
        if path.exists() {
            return Err(SproutError::ConfigValidation {
                field: MANIFEST_FILE.to_string(),
                reason: format!("{} already exists", path),
            });
        }

        write_document(&path, document).await?;
        Self::open(root).await
    }

    /// Loaded configuration
    pub fn config(&self) -> &ManifestConfig {
        &self.config
    }

    /// Project root directory
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Path to the manifest file
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Resolve a path option against the project root
    pub fn project_path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Directory holding cache artifacts and the generated project file
    pub fn tempdir_path(&self) -> ConfigResult<Utf8PathBuf> {
        Ok(self.project_path(self.config.tempdir()?))
    }

    /// Location of the transient project descriptor
    pub fn fake_project_path(&self) -> ConfigResult<Utf8PathBuf> {
        Ok(self.tempdir_path()?.join(self.config.fake_project_file()?))
    }

    /// Re-read the manifest from disk
    pub async fn reload(&mut self) -> ConfigResult<()> {
        self.config = load_config(&self.path).await?;
        Ok(())
    }

    /// Merge `value` into the manifest at `path` and reload.
    ///
    /// Keys outside `path` are left as they are, including their order.
    pub async fn update(&mut self, path: &[&str], value: Value) -> ConfigResult<()> {
        let mut document = read_document(&self.path).await?;
        merge_at_path(&mut document, path, value);

        // Reject writes that would leave an unloadable manifest
        ManifestConfig::from_document(&document)?;

        debug!("Updating {} at {}", self.path, path.join("."));
        write_document(&self.path, &document).await?;
        self.reload().await
    }
}

/// Load and validate the manifest at `path`
pub async fn load_config(path: &Utf8Path) -> ConfigResult<ManifestConfig> {
    let document = read_document(path).await?;
    ManifestConfig::from_document(&document).map_err(|e| match e {
        SproutError::ConfigValidation { field, reason } => SproutError::ConfigValidation {
            field,
            reason: format!("in file {}: {}", path, reason),
        },
        other => other,
    })
}

async fn read_document(path: &Utf8Path) -> ConfigResult<Value> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SproutError::ConfigMissing {
                path: path.to_string(),
            })
        }
        Err(e) => return Err(SproutError::io(format!("Failed to read {}", path), e)),
    };

    parse_manifest(&content).map_err(|e| match e {
        SproutError::JsonParse { message } => SproutError::JsonParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}

/// Write pretty JSON to a sibling file and rename it into place
async fn write_document(path: &Utf8Path, document: &Value) -> ConfigResult<()> {
    let mut content = serde_json::to_string_pretty(document).map_err(|e| SproutError::JsonParse {
        message: format!("JSON serialization error: {}", e),
    })?;
    content.push('\n');

    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, content)
        .await
        .map_err(|e| SproutError::io(format!("Failed to write {}", staging), e))?;
    tokio::fs::rename(&staging, path)
        .await
        .map_err(|e| SproutError::io(format!("Failed to replace {}", path), e))?;

    Ok(())
}
