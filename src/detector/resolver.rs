//! Ordered scanner set that resolves a project's golangci-lint version

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::detector::ci_config::CiConfigScanner;
use crate::detector::github_actions::GitHubActionsScanner;
use crate::detector::makefile::MakefileScanner;
use crate::detector::traits::{ScanError, Scanner};
use crate::detector::types::DetectionResult;
use crate::detector::version_file::VersionFileScanner;

/// Scanner names in the order they are consulted
pub const SOURCE_PRIORITY: [&str; 6] = [
    "version-file",
    "github-actions",
    "semaphore-ci",
    "circleci",
    "gitlab-ci",
    "makefile",
];

/// Create the default scanners, in [`SOURCE_PRIORITY`] order
pub fn default_scanners() -> Vec<Box<dyn Scanner>> {
    vec![
        Box::new(VersionFileScanner::new()),
        Box::new(GitHubActionsScanner::new()),
        Box::new(CiConfigScanner::semaphore()),
        Box::new(CiConfigScanner::circleci()),
        Box::new(CiConfigScanner::gitlab()),
        Box::new(MakefileScanner::new()),
    ]
}

/// Runs scanners against one project directory.
///
/// A scanner that fails to read its source is logged and skipped; detection is
/// best-effort across sources.
pub struct VersionResolver {
    base_dir: PathBuf,
    scanners: Vec<Box<dyn Scanner>>,
}

impl VersionResolver {
    /// Resolver with the default scanners for an existing directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let base_dir = base_dir.into();
        let metadata = std::fs::metadata(&base_dir).map_err(|e| ScanError::Io {
            path: base_dir.clone(),
            source: e,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(base_dir));
        }

        Ok(Self::with_scanners(base_dir, default_scanners()))
    }

    /// Resolver for the current working directory
    pub fn current_dir() -> Result<Self, ScanError> {
        let cwd = std::env::current_dir().map_err(|e| ScanError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        Self::new(cwd)
    }

    pub fn with_scanners(base_dir: impl Into<PathBuf>, scanners: Vec<Box<dyn Scanner>>) -> Self {
        Self {
            base_dir: base_dir.into(),
            scanners,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn scanner_names(&self) -> Vec<&'static str> {
        self.scanners.iter().map(|s| s.name()).collect()
    }

    /// First version found, in scanner priority order
    pub fn detect_first(&self) -> Option<DetectionResult> {
        self.scanners.iter().find_map(|scanner| self.run(scanner.as_ref()))
    }

    /// Every version found, one per scanner at most, in scanner priority order
    pub fn detect_all(&self) -> Vec<DetectionResult> {
        self.scanners
            .iter()
            .filter_map(|scanner| self.run(scanner.as_ref()))
            .collect()
    }

    fn run(&self, scanner: &dyn Scanner) -> Option<DetectionResult> {
        match scanner.detect(&self.base_dir) {
            Ok(Some(result)) => {
                debug!(
                    "{} found {} in {}:{}",
                    scanner.name(),
                    result.version,
                    result.source.display(),
                    result.line_number
                );
                Some(result)
            }
            Ok(None) => {
                debug!("{} found nothing", scanner.name());
                None
            }
            Err(e) => {
                warn!("Skipping {}: {}", scanner.name(), e);
                None
            }
        }
    }
}
