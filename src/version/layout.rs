//! On-disk layout of the version cache
//!
//! ```text
//! <root>/
//!   versions/<version>/<artifact>   one directory per installed version
//!   current/<artifact>              symlink to the active version's artifact
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{self, ConfigError, Platform};

const VERSIONS_DIR: &str = "versions";
const CURRENT_DIR: &str = "current";

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o700;

/// Paths of the cache tree for one platform
#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
    platform: Platform,
}

impl CacheLayout {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    /// Layout rooted at the configured cache directory, for the running platform
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(config::cache_dir()?, Platform::detect()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join(VERSIONS_DIR)
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.versions_dir().join(version)
    }

    pub fn artifact_name(&self) -> String {
        self.platform.artifact_name()
    }

    pub fn artifact_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(self.artifact_name())
    }

    pub fn current_dir(&self) -> PathBuf {
        self.root.join(CURRENT_DIR)
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.current_dir().join(self.artifact_name())
    }

    /// Whether the artifact of `version` exists, is a regular file and is executable
    pub fn is_complete(&self, version: &str) -> bool {
        fs::metadata(self.artifact_path(version))
            .map(|metadata| metadata.is_file() && is_executable(&metadata))
            .unwrap_or(false)
    }

    /// Create the directory for `version` with owner-only permissions
    pub fn ensure_version_dir(&self, version: &str) -> io::Result<PathBuf> {
        let dir = self.version_dir(version);
        create_private_dir(&dir)?;
        Ok(dir)
    }
}

pub(crate) fn create_private_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIRECTORY_MODE);
    }
    builder.create(path)
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}
