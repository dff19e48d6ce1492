//! Cache, archive and project fixtures

use std::fs;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

use glint_vm::config::Platform;
use glint_vm::version::cache::CacheStore;
use glint_vm::version::layout::CacheLayout;

pub fn linux_amd64() -> Platform {
    Platform::new("linux", "amd64")
}

/// Temporary cache root with a linux/amd64 layout
pub fn create_test_cache() -> (TempDir, CacheStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = CacheStore::new(CacheLayout::new(temp_dir.path(), linux_amd64()));
    (temp_dir, store)
}

/// Place an executable artifact under `versions/<version>/` as if it had been installed
pub fn fake_install(layout: &CacheLayout, version: &str) -> PathBuf {
    let artifact = layout.artifact_path(version);
    fs::create_dir_all(layout.version_dir(version)).unwrap();
    fs::write(&artifact, format!("#!/bin/sh\necho {version}\n")).unwrap();
    set_mode(&artifact, 0o755);
    artifact
}

/// A version directory holding a non-executable artifact
pub fn fake_incomplete_install(layout: &CacheLayout, version: &str) -> PathBuf {
    let artifact = layout.artifact_path(version);
    fs::create_dir_all(layout.version_dir(version)).unwrap();
    fs::write(&artifact, "partial").unwrap();
    set_mode(&artifact, 0o644);
    artifact
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) {}

/// Gzipped tarball holding `entries` as regular files
pub fn build_tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Release archive laid out like the published linux/amd64 tarballs
pub fn release_archive(version: &str, binary: &[u8]) -> Vec<u8> {
    let dir = format!("golangci-lint-{}-linux-amd64", version.trim_start_matches('v'));
    let license = format!("{dir}/LICENSE");
    let readme = format!("{dir}/README.md");
    let artifact = format!("{dir}/golangci-lint");
    build_tar_gz(&[
        (license.as_str(), &b"GPL-3.0"[..]),
        (readme.as_str(), &b"# golangci-lint"[..]),
        (artifact.as_str(), binary),
    ])
}

/// `<hex>  <file name>` as published next to release archives
pub fn checksum_line(data: &[u8], file_name: &str) -> String {
    let digest = Sha256::digest(data);
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{hex}  {file_name}\n")
}

/// Write `content` at `relative` under `root`, creating parent directories
pub fn write_project_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
