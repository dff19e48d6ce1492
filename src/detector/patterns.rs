//! Version extraction patterns
//!
//! An ordered table of regular expressions, each capturing a golangci-lint
//! version in group 1. Order is priority: the most explicit declarations
//! (environment-style assignments) come first, bare file names and URLs last.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::semver::normalize_version;

/// `v?MAJOR.MINOR.PATCH`, ASCII digits only
const VERSION: &str = r"(v?[0-9]+\.[0-9]+\.[0-9]+)";

/// (name, pattern) in priority order; `{V}` is replaced by [`VERSION`]
const PATTERN_SOURCES: &[(&str, &str)] = &[
    ("env-version", r#"GOLANGCI_LINT_VERSION[=:\s]+['"]?{V}['"]?"#),
    ("makefile-assign", r#"GOLANGCI_LINT_VERSION\s*:?=\s*['"]?{V}['"]?"#),
    ("install-version", r#"install-version:\s*['"]?{V}['"]?"#),
    (
        "action-version",
        r#"golangci-lint-action@v[0-9]+.*?version:\s*['"]?{V}['"]?"#,
    ),
    ("docker-image", r"golangci/golangci-lint:{V}"),
    ("at-version", r"golangci-lint@{V}"),
    ("yaml-version", r#"version:\s*['"]?{V}['"]?"#),
    ("alt-env", r#"GOLANGCI_VERSION[=:\s]+['"]?{V}['"]?"#),
    ("cli-version", r"golangci-lint.*?--version\s+{V}"),
    ("shell-script-version", r"install\.sh.*?\s+{V}\s*$"),
    ("filename", r"golangci-lint-v?([0-9]+\.[0-9]+\.[0-9]+)"),
];

static DEFAULT_TABLE: LazyLock<PatternTable> = LazyLock::new(PatternTable::new);

/// The process-wide pattern table
pub fn patterns() -> &'static PatternTable {
    &DEFAULT_TABLE
}

/// A named regular expression whose capture group holds a version
#[derive(Debug)]
pub struct VersionPattern {
    name: &'static str,
    regex: Regex,
    group: usize,
}

impl VersionPattern {
    fn new(name: &'static str, source: &str) -> Self {
        let pattern = source.replace("{V}", VERSION);
        Self {
            name,
            regex: Regex::new(&pattern).expect("version patterns are valid regexes"),
            group: 1,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the pattern and return the normalized captured version
    pub fn extract(&self, text: &str) -> Option<String> {
        let captured = self.regex.captures(text)?.get(self.group)?.as_str().trim();
        if captured.is_empty() {
            return None;
        }
        Some(normalize_version(captured))
    }
}

/// A version found by a named pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionMatch {
    pub version: String,
    pub pattern_name: &'static str,
}

/// A version found on a specific 1-based line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub version: String,
    pub pattern_name: &'static str,
    pub line_number: usize,
}

/// Ordered set of version patterns
#[derive(Debug)]
pub struct PatternTable {
    patterns: Vec<VersionPattern>,
}

impl PatternTable {
    fn new() -> Self {
        Self {
            patterns: PATTERN_SOURCES
                .iter()
                .map(|(name, source)| VersionPattern::new(name, source))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionPattern> {
        self.patterns.iter()
    }

    /// First pattern, in priority order, that extracts a version from `text`
    pub fn find(&self, text: &str) -> Option<VersionMatch> {
        self.patterns.iter().find_map(|pattern| {
            pattern.extract(text).map(|version| VersionMatch {
                version,
                pattern_name: pattern.name,
            })
        })
    }

    /// First match of every pattern, deduplicated by version.
    ///
    /// When several patterns yield the same version, the higher-priority name is kept.
    pub fn find_all(&self, text: &str) -> Vec<VersionMatch> {
        let mut seen = HashSet::new();
        self.patterns
            .iter()
            .filter_map(|pattern| {
                let version = pattern.extract(text)?;
                seen.insert(version.clone()).then_some(VersionMatch {
                    version,
                    pattern_name: pattern.name,
                })
            })
            .collect()
    }

    /// Scan `text` line by line and return the first line holding a version.
    ///
    /// Line order wins over pattern priority; priority only applies within a line.
    pub fn extract_from_lines(&self, text: &str) -> Option<LineMatch> {
        text.lines().enumerate().find_map(|(index, line)| {
            self.find(line).map(|found| LineMatch {
                version: found.version,
                pattern_name: found.pattern_name,
                line_number: index + 1,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn table_order_is_priority_order() {
        let names: Vec<&str> = patterns().iter().map(VersionPattern::name).collect();
        assert_eq!(
            names,
            vec![
                "env-version",
                "makefile-assign",
                "install-version",
                "action-version",
                "docker-image",
                "at-version",
                "yaml-version",
                "alt-env",
                "cli-version",
                "shell-script-version",
                "filename",
            ]
        );
    }

    #[rstest]
    #[case("GOLANGCI_LINT_VERSION=v1.55.2", "v1.55.2", "env-version")]
    #[case("export GOLANGCI_LINT_VERSION: '1.55.2'", "v1.55.2", "env-version")]
    #[case("  GOLANGCI_LINT_VERSION: \"v1.56.0\"", "v1.56.0", "env-version")]
    #[case("install-version: v1.52.2", "v1.52.2", "install-version")]
    #[case(
        "uses: golangci/golangci-lint-action@v3 with: version: v1.53.3",
        "v1.53.3",
        "action-version"
    )]
    #[case("image: golangci/golangci-lint:v1.54.2", "v1.54.2", "docker-image")]
    #[case(
        "go run github.com/golangci/golangci-lint/cmd/golangci-lint@v1.54.0 run",
        "v1.54.0",
        "at-version"
    )]
    #[case("version: 1.54.0", "v1.54.0", "yaml-version")]
    #[case("GOLANGCI_VERSION=1.50.1", "v1.50.1", "alt-env")]
    #[case("golangci-lint-installer --version v1.49.0", "v1.49.0", "cli-version")]
    #[case(
        "curl -sSfL https://raw.githubusercontent.com/golangci/golangci-lint/master/install.sh | sh -s -- -b bin v1.48.0",
        "v1.48.0",
        "shell-script-version"
    )]
    #[case(
        "wget https://example.com/golangci-lint-1.47.3-linux-amd64.tar.gz",
        "v1.47.3",
        "filename"
    )]
    fn find_matches_each_pattern(
        #[case] text: &str,
        #[case] version: &str,
        #[case] pattern_name: &str,
    ) {
        let found = patterns().find(text).unwrap();
        assert_eq!(found.version, version);
        assert_eq!(found.pattern_name, pattern_name);
    }

    #[rstest]
    #[case("")]
    #[case("go 1.21")]
    #[case("name: lint")]
    #[case("version: v1.2")]
    #[case("golangci-lint run ./...")]
    fn find_returns_none_without_version(#[case] text: &str) {
        assert_eq!(patterns().find(text), None);
    }

    #[rstest]
    #[case("version: v1.54.0")]
    #[case("image: golangci/golangci-lint:v1.54.0")]
    #[case("golangci-lint@v1.54.0")]
    #[case("golangci-lint-1.54.0-linux-amd64.tar.gz")]
    #[case("GOLANGCI_VERSION=v1.54.0")]
    fn env_assignment_outranks_lower_priority_patterns(#[case] other: &str) {
        let text = format!("{other} GOLANGCI_LINT_VERSION=v1.60.1");
        let found = patterns().find(&text).unwrap();
        assert_eq!(found.version, "v1.60.1");
        assert_eq!(found.pattern_name, "env-version");
    }

    #[test]
    fn find_prefers_env_version_over_at_version() {
        let found = patterns()
            .find("GOLANGCI_LINT_VERSION=v1.55.2 golangci-lint@v1.54.0")
            .unwrap();

        assert_eq!(
            found,
            VersionMatch {
                version: "v1.55.2".to_string(),
                pattern_name: "env-version",
            }
        );
    }

    #[test]
    fn find_all_deduplicates_versions_keeping_first_pattern() {
        let found = patterns().find_all("GOLANGCI_LINT_VERSION=v1.55.2 golangci-lint@v1.54.0");

        assert_eq!(
            found,
            vec![
                VersionMatch {
                    version: "v1.55.2".to_string(),
                    pattern_name: "env-version",
                },
                VersionMatch {
                    version: "v1.54.0".to_string(),
                    pattern_name: "at-version",
                },
            ]
        );
    }

    #[test]
    fn find_all_returns_empty_for_plain_text() {
        assert!(patterns().find_all("nothing to see here").is_empty());
    }

    #[test]
    fn extract_from_lines_reports_one_based_line() {
        let text = "name: lint\non: [push]\nversion: v1.54.0\nruns-on: ubuntu-latest";

        let found = patterns().extract_from_lines(text).unwrap();

        assert_eq!(
            found,
            LineMatch {
                version: "v1.54.0".to_string(),
                pattern_name: "yaml-version",
                line_number: 3,
            }
        );
    }

    #[test]
    fn extract_from_lines_prefers_earlier_line_over_priority() {
        let text = "image: golangci/golangci-lint:v1.50.0\nGOLANGCI_LINT_VERSION=v1.60.0\n";

        let found = patterns().extract_from_lines(text).unwrap();

        assert_eq!(found.version, "v1.50.0");
        assert_eq!(found.pattern_name, "docker-image");
        assert_eq!(found.line_number, 1);
    }

    #[test]
    fn extract_from_lines_handles_crlf() {
        let text = "first\r\ncurl -sSfL .../install.sh | sh -s v1.51.0\r\n";

        let found = patterns().extract_from_lines(text).unwrap();

        assert_eq!(found.version, "v1.51.0");
        assert_eq!(found.pattern_name, "shell-script-version");
        assert_eq!(found.line_number, 2);
    }

    #[test]
    fn extract_from_lines_returns_none_for_empty_text() {
        assert_eq!(patterns().extract_from_lines(""), None);
    }
}
