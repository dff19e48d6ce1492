//! Version detection layer
//! - patterns.rs: ordered version extraction patterns
//! - traits.rs: Scanner trait and ScanError
//! - types.rs: DetectionResult
//! - version_file.rs: `.golangci-lint.version` scanner
//! - github_actions.rs: `.github/workflows` scanner
//! - ci_config.rs: Semaphore, CircleCI and GitLab CI scanners
//! - makefile.rs: Makefile scanner
//! - resolver.rs: priority-ordered scanner set

pub mod ci_config;
pub mod github_actions;
pub mod makefile;
pub mod patterns;
pub mod resolver;
mod source;
pub mod traits;
pub mod types;
pub mod version_file;

pub use ci_config::CiConfigScanner;
pub use github_actions::GitHubActionsScanner;
pub use makefile::MakefileScanner;
pub use patterns::{LineMatch, PatternTable, VersionMatch, VersionPattern, patterns};
pub use resolver::{SOURCE_PRIORITY, VersionResolver, default_scanners};
pub use traits::{ScanError, Scanner};
pub use types::DetectionResult;
pub use version_file::VersionFileScanner;
