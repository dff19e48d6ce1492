//! Release index trait for listing published golangci-lint releases

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::DEFAULT_REMOTE_LIMIT;
use crate::version::error::RegistryError;

/// A published release, as returned by the GitHub Releases API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
}

impl GitHubRelease {
    pub fn is_stable(&self) -> bool {
        !self.draft && !self.prerelease
    }
}

/// Trait for fetching the list of available releases
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseIndex: Send + Sync {
    /// Fetches up to `limit` releases, newest first, with drafts and prereleases removed
    async fn fetch_releases(&self, limit: u32) -> Result<Vec<GitHubRelease>, RegistryError>;
}

/// Tag of the newest stable release, if any.
///
/// Looks at a full page so a prerelease at the top does not hide the latest stable tag.
pub async fn latest_stable(index: &dyn ReleaseIndex) -> Result<Option<String>, RegistryError> {
    let releases = index.fetch_releases(DEFAULT_REMOTE_LIMIT).await?;
    Ok(releases.into_iter().next().map(|r| r.tag_name))
}
