//! Common detection types

use std::path::PathBuf;

/// Where and how a version declaration was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionResult {
    /// Normalized version (`v<major>.<minor>.<patch>`)
    pub version: String,
    /// File the version was read from
    pub source: PathBuf,
    /// Name of the scanner that found it
    pub source_type: &'static str,
    /// 1-based line number, 0 when not line-addressable
    pub line_number: usize,
    /// Name of the pattern that matched
    pub pattern_name: &'static str,
}
