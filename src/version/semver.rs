use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

/// Prefix every normalized version starts with
pub const VERSION_PREFIX: char = 'v';

static STRICT_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+$").expect("valid regex"));

/// Ensure a version string starts with `v`.
///
/// Examples:
/// - "1.2.3" -> "v1.2.3"
/// - "v1.2.3" -> "v1.2.3"
/// - "" -> ""
pub fn normalize_version(version: &str) -> String {
    if version.is_empty() || version.starts_with(VERSION_PREFIX) {
        version.to_string()
    } else {
        format!("{VERSION_PREFIX}{version}")
    }
}

/// Accepts exactly `v<uint>.<uint>.<uint>`, no pre-release or build suffix.
pub fn validate_version(version: &str) -> bool {
    STRICT_VERSION_RE.is_match(version)
}

/// Strip the leading `v`, if any
pub fn strip_prefix(version: &str) -> &str {
    version.strip_prefix(VERSION_PREFIX).unwrap_or(version)
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles a leading `v` and partial versions like "1" or "1.2" by padding with zeros.
///
/// Examples:
/// - "v1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "v1.2.3" -> Version(1, 2, 3)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = strip_prefix(version);
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.as_slice() {
        [major] => format!("{major}.0.0"),
        [major, minor] => format!("{major}.{minor}.0"),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Newest-first ordering of two version strings.
///
/// Parsed versions come before unparseable ones; two unparseable versions
/// compare equal so callers can apply their own tie-break.
pub fn compare_newest_first(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
