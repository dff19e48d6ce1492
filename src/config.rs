use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// =============================================================================
// Release endpoints
// =============================================================================

/// Name of the managed tool, also the artifact file name
pub const TOOL_NAME: &str = "golangci-lint";

/// Base URL release archives are downloaded from
pub const RELEASES_BASE_URL: &str = "https://github.com/golangci/golangci-lint/releases/download";

/// Base URL for the GitHub API
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Repository whose releases are listed
pub const RELEASE_REPOSITORY: &str = "golangci/golangci-lint";

/// Suffix of the companion checksum resource of an archive
pub const CHECKSUM_SUFFIX: &str = ".sha256";

// =============================================================================
// Time and size limits
// =============================================================================

/// Timeout for archive and checksum downloads (10 minutes)
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Timeout for release index requests (30 seconds)
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on the bytes extracted for a single artifact (500 MiB)
pub const MAX_EXTRACT_SIZE: u64 = 500 * 1024 * 1024;

/// Default number of releases shown by `list-remote`
pub const DEFAULT_REMOTE_LIMIT: u32 = 20;

/// Default number of versions kept by `cache clean`
pub const DEFAULT_KEEP_VERSIONS: i64 = 3;

const APP_NAME: &str = "glint-vm";

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "GLINT_VM_CACHE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory; set XDG_CACHE_HOME or GLINT_VM_CACHE_DIR")]
    NoHomeDir,
}

/// Build-time information, fixed at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: match option_env!("GLINT_VM_COMMIT") {
                Some(commit) => commit,
                None => "unknown",
            },
            date: match option_env!("GLINT_VM_BUILD_DATE") {
                Some(date) => date,
                None => "unknown",
            },
        }
    }
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (commit: {}, built: {})",
            self.version, self.commit, self.date
        )
    }
}

/// Operating system and architecture, named the way release archives name them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// Platform of the running binary
    pub fn detect() -> Self {
        Self::from_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_target(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "x86" => "386",
            "arm" => "armv6",
            other => other,
        };
        Self::new(os, arch)
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// `<os>-<arch>`, e.g. `linux-amd64`
    pub fn as_string(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// File name of the golangci-lint executable on this platform
    pub fn artifact_name(&self) -> String {
        if self.is_windows() {
            format!("{TOOL_NAME}.exe")
        } else {
            TOOL_NAME.to_string()
        }
    }
}

/// Returns the cache root for glint-vm.
/// Uses $GLINT_VM_CACHE_DIR if set, then $XDG_CACHE_HOME/glint-vm,
/// then ~/.cache/glint-vm.
pub fn cache_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = non_empty_env(CACHE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    cache_dir_with_env(non_empty_env("XDG_CACHE_HOME"), dirs::home_dir())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn cache_dir_with_env(
    xdg_cache_home: Option<String>,
    home_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    let base = xdg_cache_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .ok_or(ConfigError::NoHomeDir)?;

    Ok(base.join(APP_NAME))
}
