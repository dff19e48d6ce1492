//! `.golangci-lint.version` scanner
//!
//! Accepts either any recognised declaration (e.g. `GOLANGCI_LINT_VERSION=v1.55.2`)
//! or the bare version as the whole file content (`v1.55.2` or `1.55.2`).

use std::path::Path;

use crate::detector::source::{read_optional, scan_content};
use crate::detector::traits::{ScanError, Scanner};
use crate::detector::types::DetectionResult;
use crate::version::semver::{normalize_version, validate_version};

/// Name of the dedicated version file
pub const VERSION_FILE_NAME: &str = ".golangci-lint.version";

/// Pattern name reported when the whole file is a bare version
pub const PLAIN_VERSION_PATTERN: &str = "plain-version";

/// Scanner for the dedicated version file in the project root
pub struct VersionFileScanner;

impl VersionFileScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VersionFileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for VersionFileScanner {
    fn name(&self) -> &'static str {
        "version-file"
    }

    fn detect(&self, base_dir: &Path) -> Result<Option<DetectionResult>, ScanError> {
        let path = base_dir.join(VERSION_FILE_NAME);
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };

        if let Some(result) = scan_content(&content, &path, self.name()) {
            return Ok(Some(result));
        }

        let version = normalize_version(content.trim());
        if !validate_version(&version) {
            return Ok(None);
        }

        Ok(Some(DetectionResult {
            version,
            source: path,
            source_type: self.name(),
            line_number: 1,
            pattern_name: PLAIN_VERSION_PATTERN,
        }))
    }
}
