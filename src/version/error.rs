use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("version {0} is not cached")]
    NotCached(String),

    #[error("version {0} is not installed")]
    NotInstalled(String),

    #[error("invalid version '{0}': expected vMAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("keep must be >= 0, got {0}")]
    InvalidKeep(i64),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP request to {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("checksum file at {0} is empty")]
    EmptyChecksum(String),

    #[error("{0} not found in archive")]
    ArtifactNotFound(String),

    #[error("{name} exceeds the extraction limit of {limit} bytes")]
    ArtifactTooLarge { name: String, limit: u64 },

    #[error("invalid version '{0}': expected vMAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    #[error("version {0} is incomplete after installation")]
    Incomplete(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
