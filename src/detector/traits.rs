//! Scanner trait definition

#[cfg(test)]
use mockall::automock;

use std::path::{Path, PathBuf};

use crate::detector::types::DetectionResult;

/// A strategy that inspects one configuration surface for a declared version
#[cfg_attr(test, automock)]
pub trait Scanner: Send + Sync {
    /// Stable identifier, also used as the result's source type
    fn name(&self) -> &'static str;

    /// Look for a version under `base_dir`.
    ///
    /// # Returns
    /// * `Ok(Some(result))` - A version was found
    /// * `Ok(None)` - The source is absent or declares no version
    /// * `Err(ScanError)` - The source exists but could not be read
    fn detect(&self, base_dir: &Path) -> Result<Option<DetectionResult>, ScanError>;
}

/// Error type for detection
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// A source exists but reading it failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory to scan is not a directory
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}
