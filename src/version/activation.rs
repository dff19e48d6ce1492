//! The `current/` pointer naming the active version

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use crate::version::error::CacheError;
use crate::version::layout::{CacheLayout, create_private_dir};
use crate::version::semver::{normalize_version, validate_version};

/// Single symlink at `current/<artifact>` aimed at one installed version's artifact
#[derive(Debug, Clone)]
pub struct Activation {
    layout: CacheLayout,
}

impl Activation {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    /// Point `current/` at `version`, which must be installed and complete
    pub fn set_current(&self, version: &str) -> Result<(), CacheError> {
        let version = normalize_version(version);
        if !validate_version(&version) {
            return Err(CacheError::InvalidVersion(version));
        }
        if !self.layout.is_complete(&version) {
            return Err(CacheError::NotInstalled(version));
        }

        let current_dir = self.layout.current_dir();
        create_private_dir(&current_dir).map_err(|e| CacheError::io(&current_dir, e))?;

        let pointer = self.layout.pointer_path();
        remove_if_present(&pointer)?;

        let target = self.layout.artifact_path(&version);
        symlink(&target, &pointer).map_err(|e| CacheError::io(&pointer, e))?;

        info!("Activated {} -> {}", version, target.display());
        Ok(())
    }

    /// Version the pointer targets, or `None` when no version is active
    pub fn current(&self) -> Result<Option<String>, CacheError> {
        let pointer = self.layout.pointer_path();

        let target = match fs::read_link(&pointer) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(pointer, e)),
        };

        Ok(target
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned()))
    }

    /// Remove the pointer; absent is fine
    pub fn clear(&self) -> Result<(), CacheError> {
        remove_if_present(&self.layout.pointer_path())
    }
}

fn remove_if_present(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io(path, e)),
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
