//! Single-file CI configuration scanners (Semaphore, CircleCI, GitLab CI)

use std::path::{Path, PathBuf};

use crate::detector::source::scan_file;
use crate::detector::traits::{ScanError, Scanner};
use crate::detector::types::DetectionResult;

/// Scanner for one fixed CI configuration file relative to the project root
pub struct CiConfigScanner {
    name: &'static str,
    components: &'static [&'static str],
}

impl CiConfigScanner {
    /// `.semaphore/semaphore.yml`
    pub fn semaphore() -> Self {
        Self {
            name: "semaphore-ci",
            components: &[".semaphore", "semaphore.yml"],
        }
    }

    /// `.circleci/config.yml`
    pub fn circleci() -> Self {
        Self {
            name: "circleci",
            components: &[".circleci", "config.yml"],
        }
    }

    /// `.gitlab-ci.yml`
    pub fn gitlab() -> Self {
        Self {
            name: "gitlab-ci",
            components: &[".gitlab-ci.yml"],
        }
    }

    pub fn path_in(&self, base_dir: &Path) -> PathBuf {
        self.components
            .iter()
            .fold(base_dir.to_path_buf(), |path, component| path.join(component))
    }
}

impl Scanner for CiConfigScanner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn detect(&self, base_dir: &Path) -> Result<Option<DetectionResult>, ScanError> {
        scan_file(&self.path_in(base_dir), self.name)
    }
}
