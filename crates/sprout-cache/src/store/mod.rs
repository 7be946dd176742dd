//! Fingerprinted classpath store
//!
//! The resolved classpath lives in two companion files inside the project's
//! temp directory. `classpath.fingerprint` is only ever present next to the
//! value it was computed for, so a value without a matching fingerprint is
//! treated as a miss.

use std::future::Future;

use camino::{Utf8Path, Utf8PathBuf};
use sprout_core::error::SproutError;
use sprout_core::types::DependencySet;
use sprout_core::utils::{fingerprint, Fingerprint};
use tracing::debug;

use crate::descriptor::{render_project_file, DescriptorGuard};
use crate::tool::BuildTool;
use crate::CacheResult;

/// File holding the hex fingerprint of the cached dependency set
pub const FINGERPRINT_FILE: &str = "classpath.fingerprint";

/// File holding the cached classpath
pub const VALUE_FILE: &str = "classpath.value";

/// A persisted fingerprint/value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub fingerprint: Fingerprint,
    pub resolved_paths: String,
}

/// Outcome of comparing the persisted record with a dependency set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheStatus {
    /// Nothing usable on disk
    Miss,
    /// A record exists for a different dependency set
    Stale,
    /// The persisted classpath matches
    Hit(String),
}

/// Classpath cache rooted in a directory
#[derive(Debug, Clone)]
pub struct ResolutionCache {
    dir: Utf8PathBuf,
}

impl ResolutionCache {
    /// Cache whose artifacts live in `dir`
    pub fn new<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn fingerprint_path(&self) -> Utf8PathBuf {
        self.dir.join(FINGERPRINT_FILE)
    }

    pub fn value_path(&self) -> Utf8PathBuf {
        self.dir.join(VALUE_FILE)
    }

    /// Read the persisted record; `None` if either file is missing or the
    /// fingerprint is unreadable
    pub async fn read_record(&self) -> CacheResult<Option<CacheRecord>> {
        let Some(hex) = read_optional(&self.fingerprint_path()).await? else {
            return Ok(None);
        };
        let Some(resolved_paths) = read_optional(&self.value_path()).await? else {
            return Ok(None);
        };

        match Fingerprint::from_hex(&hex) {
            Ok(fingerprint) => Ok(Some(CacheRecord {
                fingerprint,
                resolved_paths,
            })),
            Err(e) => {
                debug!("Ignoring corrupt fingerprint file: {}", e);
                Ok(None)
            }
        }
    }

    /// Compare the persisted record with `deps`
    pub async fn status(&self, deps: &DependencySet) -> CacheResult<CacheStatus> {
        let status = match self.read_record().await? {
            None => CacheStatus::Miss,
            Some(record) if record.fingerprint == fingerprint(deps) => {
                CacheStatus::Hit(record.resolved_paths)
            }
            Some(_) => CacheStatus::Stale,
        };
        Ok(status)
    }

    /// Return the cached classpath for `deps`, running `recompute` only when
    /// the persisted fingerprint does not match.
    ///
    /// A failed recompute is returned as-is and leaves the cache untouched.
    pub async fn get_resolved_paths<F, Fut>(
        &self,
        deps: &DependencySet,
        recompute: F,
    ) -> CacheResult<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CacheResult<String>>,
    {
        let current = fingerprint(deps);

        match self.status(deps).await? {
            CacheStatus::Hit(value) => {
                debug!("Classpath cache hit ({})", current);
                return Ok(value);
            }
            CacheStatus::Stale => debug!("Classpath cache stale, recomputing"),
            CacheStatus::Miss => debug!("Classpath cache miss, recomputing"),
        }

        let value = recompute().await?;
        self.persist(&CacheRecord {
            fingerprint: current,
            resolved_paths: value.clone(),
        })
        .await?;

        Ok(value)
    }

    /// Write a record.
    ///
    /// The old fingerprint is removed first and the new one is renamed into
    /// place last, so an interrupted write reads back as a miss.
    pub async fn persist(&self, record: &CacheRecord) -> CacheResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SproutError::io(format!("Failed to create {}", self.dir), e))?;

        remove_optional(&self.fingerprint_path()).await?;
        write_replace(&self.value_path(), &record.resolved_paths).await?;
        write_replace(&self.fingerprint_path(), &record.fingerprint.to_hex()).await?;

        debug!("Persisted classpath for {}", record.fingerprint);
        Ok(())
    }

    /// Remove both artifacts
    pub async fn invalidate(&self) -> CacheResult<()> {
        remove_optional(&self.fingerprint_path()).await?;
        remove_optional(&self.value_path()).await?;
        debug!("Invalidated classpath cache in {}", self.dir);
        Ok(())
    }

    /// Cached classpath for `deps`, computed with `tool` on a miss
    pub async fn classpath<T: BuildTool>(
        &self,
        deps: &DependencySet,
        tool: &T,
        descriptor_path: &Utf8Path,
    ) -> CacheResult<String> {
        self.get_resolved_paths(deps, || Self::resolve_classpath(deps, tool, descriptor_path))
            .await
    }

    /// Write a project descriptor for `deps` to `descriptor_path` and ask
    /// `tool` for its classpath. The descriptor is removed afterwards
    /// whether or not the tool succeeds.
    pub async fn resolve_classpath<T: BuildTool>(
        deps: &DependencySet,
        tool: &T,
        descriptor_path: &Utf8Path,
    ) -> CacheResult<String> {
        let guard = DescriptorGuard::write(descriptor_path, &render_project_file(deps)).await?;

        let project_dir = guard
            .path()
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        debug!("Resolving {} dependencies with {}", deps.len(), tool.name());
        let result = tool.classpath(project_dir).await;
        drop(guard);
        result
    }
}

async fn read_optional(path: &Utf8Path) -> CacheResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SproutError::io(format!("Failed to read {}", path), e)),
    }
}

async fn remove_optional(path: &Utf8Path) -> CacheResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SproutError::io(format!("Failed to remove {}", path), e)),
    }
}

async fn write_replace(path: &Utf8Path, contents: &str) -> CacheResult<()> {
    let tmp = Utf8PathBuf::from(format!("{}.tmp", path));
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| SproutError::io(format!("Failed to write {}", tmp), e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| SproutError::io(format!("Failed to replace {}", path), e))
}
