//! GitHub Releases API release index

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{API_TIMEOUT, GITHUB_API_BASE_URL, RELEASE_REPOSITORY};
use crate::version::error::RegistryError;
use crate::version::registry::{GitHubRelease, ReleaseIndex};

/// Release index backed by `GET /repos/<owner>/<repo>/releases`
pub struct GitHubReleases {
    client: reqwest::Client,
    base_url: String,
    repository: String,
}

impl GitHubReleases {
    /// Creates a release index against a custom API base URL
    pub fn new(base_url: &str, repository: &str) -> Result<Self, RegistryError> {
        Self::with_timeout(base_url, repository, API_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        repository: &str,
        timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("glint-vm/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
        })
    }

    /// The golangci-lint repository on api.github.com
    pub fn golangci_lint() -> Result<Self, RegistryError> {
        Self::new(GITHUB_API_BASE_URL, RELEASE_REPOSITORY)
    }
}

#[async_trait::async_trait]
impl ReleaseIndex for GitHubReleases {
    async fn fetch_releases(&self, limit: u32) -> Result<Vec<GitHubRelease>, RegistryError> {
        let url = format!(
            "{}/repos/{}/releases?per_page={}",
            self.base_url, self.repository, limit
        );
        debug!("Fetching releases from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(self.repository.clone()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(RegistryError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<GitHubRelease> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(releases.into_iter().filter(GitHubRelease::is_stable).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn fetch_releases_filters_drafts_and_prereleases() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/golangci/golangci-lint/releases")
            .match_query(Matcher::UrlEncoded("per_page".into(), "20".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"tag_name": "v1.61.0-rc1", "name": "v1.61.0-rc1", "published_at": "2024-09-01T00:00:00Z", "prerelease": true, "draft": false},
                    {"tag_name": "v1.60.3", "name": "v1.60.3", "published_at": "2024-08-22T00:00:00Z", "prerelease": false, "draft": false},
                    {"tag_name": "v1.60.2", "name": null, "published_at": null, "prerelease": false, "draft": true},
                    {"tag_name": "v1.60.1", "name": "v1.60.1", "published_at": "2024-08-13T00:00:00Z", "prerelease": false, "draft": false}
                ]"#,
            )
            .create_async()
            .await;

        let index = GitHubReleases::new(&server.url(), "golangci/golangci-lint").unwrap();
        let releases = index.fetch_releases(20).await.unwrap();

        mock.assert_async().await;
        let tags: Vec<&str> = releases.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["v1.60.3", "v1.60.1"]);
        assert_eq!(
            releases[0].published_at.map(|t| t.to_rfc3339()),
            Some("2024-08-22T00:00:00+00:00".to_string())
        );
    }

    #[tokio::test]
    async fn fetch_releases_returns_not_found_for_nonexistent_repo() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/nonexistent/repo/releases")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let index = GitHubReleases::new(&server.url(), "nonexistent/repo").unwrap();
        let result = index.fetch_releases(5).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_releases_returns_rate_limited_for_429() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/golangci/golangci-lint/releases")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_header("retry-after", "60")
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let index = GitHubReleases::new(&server.url(), "golangci/golangci-lint").unwrap();
        let result = index.fetch_releases(5).await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(RegistryError::RateLimited {
                retry_after_secs: Some(60)
            })
        ));
    }

    #[tokio::test]
    async fn fetch_releases_rejects_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/repos/golangci/golangci-lint/releases")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"not": "an array"}"#)
            .create_async()
            .await;

        let index = GitHubReleases::new(&server.url(), "golangci/golangci-lint").unwrap();
        let result = index.fetch_releases(5).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }
}
