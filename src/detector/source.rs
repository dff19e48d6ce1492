//! File helpers shared by the scanners

use std::fs;
use std::io;
use std::path::Path;

use crate::detector::patterns::patterns;
use crate::detector::traits::ScanError;
use crate::detector::types::DetectionResult;

/// Read a file as text; a missing file is `None`, not an error.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, ScanError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScanError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Line-scan `content` read from `path`
pub(crate) fn scan_content(
    content: &str,
    path: &Path,
    source_type: &'static str,
) -> Option<DetectionResult> {
    patterns()
        .extract_from_lines(content)
        .map(|found| DetectionResult {
            version: found.version,
            source: path.to_path_buf(),
            source_type,
            line_number: found.line_number,
            pattern_name: found.pattern_name,
        })
}

/// Read and line-scan the file at `path`
pub(crate) fn scan_file(
    path: &Path,
    source_type: &'static str,
) -> Result<Option<DetectionResult>, ScanError> {
    Ok(read_optional(path)?.and_then(|content| scan_content(&content, path, source_type)))
}
