//! GitHub Actions workflow scanner (`.github/workflows/*.yml|*.yaml`)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::detector::source::scan_file;
use crate::detector::traits::{ScanError, Scanner};
use crate::detector::types::DetectionResult;

/// Scanner for every workflow file in `.github/workflows`, non-recursively.
///
/// Files are visited in lexicographic order of their names so the result does
/// not depend on directory iteration order.
pub struct GitHubActionsScanner;

impl GitHubActionsScanner {
    pub fn new() -> Self {
        Self
    }

    fn workflow_files(dir: &Path) -> Result<Option<Vec<PathBuf>>, ScanError> {
        let io_error = |source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error)?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if is_yaml(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(Some(files))
    }
}

impl Default for GitHubActionsScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    )
}

impl Scanner for GitHubActionsScanner {
    fn name(&self) -> &'static str {
        "github-actions"
    }

    fn detect(&self, base_dir: &Path) -> Result<Option<DetectionResult>, ScanError> {
        let dir = base_dir.join(".github").join("workflows");
        let Some(files) = Self::workflow_files(&dir)? else {
            return Ok(None);
        };

        for path in files {
            match scan_file(&path, self.name()) {
                Ok(Some(result)) => return Ok(Some(result)),
                Ok(None) => {}
                Err(e) => debug!("Skipping unreadable workflow: {}", e),
            }
        }

        Ok(None)
    }
}
