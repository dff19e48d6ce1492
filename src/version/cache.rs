//! Enumeration, ordering and pruning of installed versions

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::version::error::CacheError;
use crate::version::layout::CacheLayout;
use crate::version::semver::{compare_newest_first, normalize_version, validate_version};

/// One entry under `versions/`, computed fresh on every listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedVersion {
    pub version: String,
    pub path: PathBuf,
    pub artifact_path: PathBuf,
    /// Artifact size in bytes, 0 when the artifact is missing
    pub size: u64,
    /// Artifact modification time, or the directory's when the artifact is missing
    pub modified: Option<SystemTime>,
    pub is_complete: bool,
}

/// Outcome of a bulk removal: what went away and what could not be removed
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: usize,
    pub failures: Vec<(String, CacheError)>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of installed versions backed by the `versions/` directory
#[derive(Debug, Clone)]
pub struct CacheStore {
    layout: CacheLayout,
}

impl CacheStore {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Whether `version` is cached and complete
    pub fn is_cached(&self, version: &str) -> bool {
        self.layout.is_complete(&normalize_version(version))
    }

    /// All cached versions, newest semantic version first.
    ///
    /// Directories whose names do not parse as versions go last, most recently
    /// modified first. A missing `versions/` directory yields an empty list.
    pub fn list(&self) -> Result<Vec<CachedVersion>, CacheError> {
        let versions_dir = self.layout.versions_dir();

        let entries = match fs::read_dir(&versions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::io(versions_dir, e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CacheError::io(&versions_dir, e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| CacheError::io(entry.path(), e))?
                .is_dir();
            if !is_dir {
                continue;
            }

            let version = entry.file_name().to_string_lossy().into_owned();
            versions.push(self.describe(version));
        }

        versions.sort_by(|a, b| {
            compare_newest_first(&a.version, &b.version).then_with(|| b.modified.cmp(&a.modified))
        });

        debug!("Found {} cached versions", versions.len());
        Ok(versions)
    }

    fn describe(&self, version: String) -> CachedVersion {
        let path = self.layout.version_dir(&version);
        let artifact_path = self.layout.artifact_path(&version);
        let is_complete = self.layout.is_complete(&version);

        let (size, modified) = match fs::metadata(&artifact_path) {
            Ok(metadata) => (metadata.len(), metadata.modified().ok()),
            Err(_) => (
                0,
                fs::metadata(&path).and_then(|m| m.modified()).ok(),
            ),
        };

        CachedVersion {
            version,
            path,
            artifact_path,
            size,
            modified,
            is_complete,
        }
    }

    /// Remove one cached version directory.
    ///
    /// `version` must be `vMAJOR.MINOR.PATCH` after normalization; anything else is
    /// rejected before the filesystem is touched.
    pub fn remove(&self, version: &str) -> Result<(), CacheError> {
        let version = normalize_version(version);
        if !validate_version(&version) {
            return Err(CacheError::InvalidVersion(version));
        }
        let dir = self.layout.version_dir(&version);

        if !dir.exists() {
            return Err(CacheError::NotCached(version));
        }

        fs::remove_dir_all(&dir).map_err(|e| CacheError::io(&dir, e))?;
        info!("Removed cached version {}", version);
        Ok(())
    }

    /// Remove every cached version, continuing past individual failures
    pub fn remove_all(&self) -> Result<RemovalReport, CacheError> {
        let versions = self.list()?;
        Ok(self.remove_each(versions))
    }

    /// Keep the `keep` newest versions and remove the rest
    pub fn remove_oldest(&self, keep: i64) -> Result<RemovalReport, CacheError> {
        let keep = usize::try_from(keep).map_err(|_| CacheError::InvalidKeep(keep))?;

        let versions = self.list()?;
        if versions.len() <= keep {
            return Ok(RemovalReport::default());
        }

        Ok(self.remove_each(versions.into_iter().skip(keep)))
    }

    /// Remove versions whose artifact is missing or not executable
    pub fn remove_incomplete(&self) -> Result<RemovalReport, CacheError> {
        let versions = self.list()?;
        Ok(self.remove_each(versions.into_iter().filter(|v| !v.is_complete)))
    }

    /// Sum of artifact sizes across all cached versions
    pub fn total_size(&self) -> Result<u64, CacheError> {
        Ok(self.list()?.iter().map(|v| v.size).sum())
    }

    /// Remove listed entries by their listed path, so unparseable names go too
    fn remove_each(&self, versions: impl IntoIterator<Item = CachedVersion>) -> RemovalReport {
        let mut report = RemovalReport::default();
        for cached in versions {
            match fs::remove_dir_all(&cached.path).map_err(|e| CacheError::io(&cached.path, e)) {
                Ok(()) => {
                    info!("Removed cached version {}", cached.version);
                    report.removed += 1;
                }
                Err(e) => {
                    warn!("Failed to remove {}: {}", cached.version, e);
                    report.failures.push((cached.version, e));
                }
            }
        }
        report
    }
}
