//! Fetch, verify, extract and commit one golangci-lint release into the cache

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::{
    CHECKSUM_SUFFIX, DOWNLOAD_TIMEOUT, MAX_EXTRACT_SIZE, RELEASES_BASE_URL, TOOL_NAME,
};
use crate::version::archive::{extract_artifact, make_executable, sha256_file, verify_checksum};
use crate::version::cache::CacheStore;
use crate::version::error::InstallError;
use crate::version::semver::{normalize_version, strip_prefix, validate_version};

const TEMP_ARCHIVE_NAME: &str = "archive.tar.gz";

/// How an install request was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The version was already cached and complete; nothing was fetched
    AlreadyInstalled,
    /// The version was downloaded and committed
    Installed { checksum_verified: bool },
}

/// Downloads release archives into the cache's `versions/<version>/` layout
pub struct Installer {
    client: reqwest::Client,
    base_url: String,
    store: CacheStore,
    max_extract_size: u64,
}

impl Installer {
    /// Installer against the official golangci-lint release downloads
    pub fn new(store: CacheStore) -> Result<Self, InstallError> {
        Self::with_base_url(store, RELEASES_BASE_URL, DOWNLOAD_TIMEOUT)
    }

    pub fn with_base_url(
        store: CacheStore,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("glint-vm/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            max_extract_size: MAX_EXTRACT_SIZE,
        })
    }

    /// Override the extraction bound
    pub fn with_max_extract_size(mut self, limit: u64) -> Self {
        self.max_extract_size = limit;
        self
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// `<base>/<version>/golangci-lint-<version without v>-<os>-<arch>.tar.gz`
    pub fn archive_url(&self, version: &str) -> String {
        let platform = self.store.layout().platform().as_string();
        format!(
            "{}/{}/{}-{}-{}.tar.gz",
            self.base_url,
            version,
            TOOL_NAME,
            strip_prefix(version),
            platform
        )
    }

    /// Install `version` unless it is already cached and complete.
    ///
    /// Any failure after the version directory is created removes that directory.
    pub async fn install(&self, version: &str) -> Result<InstallOutcome, InstallError> {
        let version = normalize_version(version);
        if !validate_version(&version) {
            return Err(InstallError::InvalidVersion(version));
        }

        if self.store.is_cached(&version) {
            debug!("{} is already installed", version);
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        let archive_url = self.archive_url(&version);
        info!("Downloading {} {} from {}", TOOL_NAME, version, archive_url);

        let version_dir = self
            .store
            .layout()
            .ensure_version_dir(&version)
            .map_err(|e| InstallError::io(self.store.layout().version_dir(&version), e))?;

        match self.populate(&version, &version_dir, &archive_url).await {
            Ok(checksum_verified) => {
                info!(
                    "Installed {} {} at {}",
                    TOOL_NAME,
                    version,
                    self.store.layout().artifact_path(&version).display()
                );
                Ok(InstallOutcome::Installed { checksum_verified })
            }
            Err(e) => {
                warn!("Installing {} failed, rolling back: {}", version, e);
                if let Err(cleanup) = tokio::fs::remove_dir_all(&version_dir).await {
                    warn!("Failed to remove {}: {}", version_dir.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    async fn populate(
        &self,
        version: &str,
        version_dir: &Path,
        archive_url: &str,
    ) -> Result<bool, InstallError> {
        let archive_path = version_dir.join(TEMP_ARCHIVE_NAME);
        self.download_to(archive_url, &archive_path).await?;

        let checksum_url = format!("{archive_url}{CHECKSUM_SUFFIX}");
        let checksum_verified = match self.fetch_checksum(&checksum_url).await? {
            Some(expected) => {
                let actual = {
                    let archive_path = archive_path.clone();
                    tokio::task::spawn_blocking(move || sha256_file(&archive_path)).await??
                };
                verify_checksum(&expected, &actual, &checksum_url)?;
                info!("Checksum verified");
                true
            }
            None => false,
        };

        let artifact = self.extract(&archive_path, version_dir).await?;
        debug!("Extracted {}", artifact.display());

        tokio::fs::remove_file(&archive_path)
            .await
            .map_err(|e| InstallError::io(&archive_path, e))?;

        if !self.store.layout().is_complete(version) {
            return Err(InstallError::Incomplete(version.to_string()));
        }

        Ok(checksum_verified)
    }

    async fn download_to(&self, url: &str, dest: &Path) -> Result<(), InstallError> {
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let mut file = File::create(dest)
            .await
            .map_err(|e| InstallError::io(dest, e))?;

        let mut bytes_downloaded: u64 = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| InstallError::io(dest, e))?;
            bytes_downloaded += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| InstallError::io(dest, e))?;

        debug!("Downloaded {} bytes to {}", bytes_downloaded, dest.display());
        Ok(())
    }

    /// Checksum file contents, or `None` when the release does not publish one
    async fn fetch_checksum(&self, url: &str) -> Result<Option<String>, InstallError> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Could not download checksum file, skipping verification: {}", e);
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            warn!(
                "Checksum file not available (HTTP {}), skipping verification",
                response.status()
            );
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }

    /// Extraction runs on the blocking pool
    async fn extract(&self, archive_path: &Path, version_dir: &Path) -> Result<PathBuf, InstallError> {
        let layout = self.store.layout();
        let archive_path = archive_path.to_path_buf();
        let version_dir = version_dir.to_path_buf();
        let artifact_name = layout.artifact_name();
        let limit = self.max_extract_size;
        let executable = !layout.platform().is_windows();

        tokio::task::spawn_blocking(move || {
            let artifact = extract_artifact(&archive_path, &version_dir, &artifact_name, limit)?;
            if executable {
                make_executable(&artifact)?;
            }
            Ok::<_, InstallError>(artifact)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::version::layout::CacheLayout;

    fn installer(base_url: &str, platform: Platform) -> Installer {
        let store = CacheStore::new(CacheLayout::new("/cache", platform));
        Installer::with_base_url(store, base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn archive_url_strips_prefix_in_file_name_only() {
        let installer = installer(
            "https://github.com/golangci/golangci-lint/releases/download/",
            Platform::new("linux", "amd64"),
        );

        assert_eq!(
            installer.archive_url("v1.55.2"),
            "https://github.com/golangci/golangci-lint/releases/download/v1.55.2/golangci-lint-1.55.2-linux-amd64.tar.gz"
        );
    }

    #[tokio::test]
    async fn install_rejects_malformed_version_before_touching_cache() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let layout = CacheLayout::new(temp_dir.path(), Platform::new("linux", "amd64"));
        let store = CacheStore::new(layout);
        let installer =
            Installer::with_base_url(store, "http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        let result = installer.install("1.0.0/../../elsewhere").await;

        assert!(matches!(result, Err(InstallError::InvalidVersion(_))));
        assert!(!temp_dir.path().join("versions").exists());
    }

    #[test]
    fn archive_url_uses_platform_string() {
        let installer = installer("http://mirror", Platform::new("darwin", "arm64"));

        assert_eq!(
            installer.archive_url("v2.0.0"),
            "http://mirror/v2.0.0/golangci-lint-2.0.0-darwin-arm64.tar.gz"
        );
    }
}
