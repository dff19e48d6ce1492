//! Makefile scanner

use std::path::Path;

use crate::detector::source::scan_file;
use crate::detector::traits::{ScanError, Scanner};
use crate::detector::types::DetectionResult;

/// Conventional Makefile names, tried in order
pub const MAKEFILE_NAMES: &[&str] = &["Makefile", "makefile", "GNUmakefile"];

/// Scanner for the project's Makefile
pub struct MakefileScanner;

impl MakefileScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MakefileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for MakefileScanner {
    fn name(&self) -> &'static str {
        "makefile"
    }

    fn detect(&self, base_dir: &Path) -> Result<Option<DetectionResult>, ScanError> {
        for file_name in MAKEFILE_NAMES {
            if let Some(result) = scan_file(&base_dir.join(file_name), self.name())? {
                return Ok(Some(result));
            }
        }
        Ok(None)
    }
}
