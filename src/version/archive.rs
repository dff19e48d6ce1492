//! Checksum verification and single-artifact extraction for release archives

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::version::error::InstallError;

/// Lowercase hex SHA-256 of the file at `path`
pub fn sha256_file(path: &Path) -> Result<String, InstallError> {
    let mut file = File::open(path).map_err(|e| InstallError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| InstallError::io(path, e))?;
    Ok(format_sha256_hex(&hasher.finalize()))
}

fn format_sha256_hex(hash: &[u8]) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Compare `actual` against the first whitespace-delimited token of a checksum file.
///
/// Comparison ignores case. `source` names the checksum file in errors.
pub fn verify_checksum(checksum_file: &str, actual: &str, source: &str) -> Result<(), InstallError> {
    let expected = checksum_file
        .split_whitespace()
        .next()
        .ok_or_else(|| InstallError::EmptyChecksum(source.to_string()))?;

    if !expected.eq_ignore_ascii_case(actual.trim()) {
        return Err(InstallError::ChecksumMismatch {
            expected: expected.to_lowercase(),
            actual: actual.trim().to_lowercase(),
        });
    }

    Ok(())
}

/// Extract the first regular entry whose name ends with `artifact_name` into `dest_dir`.
///
/// The artifact is written under its base name and may not exceed `limit` bytes.
pub fn extract_artifact(
    archive_path: &Path,
    dest_dir: &Path,
    artifact_name: &str,
    limit: u64,
) -> Result<PathBuf, InstallError> {
    let file = File::open(archive_path).map_err(|e| InstallError::io(archive_path, e))?;
    let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
    let mut archive = tar::Archive::new(decoder);

    let archive_error = |source| InstallError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let entry_path = entry.path().map_err(archive_error)?.into_owned();
        if !entry_path.to_string_lossy().ends_with(artifact_name) {
            continue;
        }

        let Some(file_name) = entry_path.file_name() else {
            continue;
        };
        let target = dest_dir.join(file_name);
        debug!("Extracting {} to {}", entry_path.display(), target.display());

        copy_bounded(&mut entry, &target, limit).map_err(|e| match e {
            BoundedCopyError::TooLarge => InstallError::ArtifactTooLarge {
                name: artifact_name.to_string(),
                limit,
            },
            BoundedCopyError::Io(source) => InstallError::io(&target, source),
        })?;

        return Ok(target);
    }

    Err(InstallError::ArtifactNotFound(artifact_name.to_string()))
}

enum BoundedCopyError {
    TooLarge,
    Io(io::Error),
}

fn copy_bounded(reader: &mut impl Read, target: &Path, limit: u64) -> Result<(), BoundedCopyError> {
    let mut out = File::create(target).map_err(BoundedCopyError::Io)?;
    let copied = io::copy(&mut reader.take(limit + 1), &mut out).map_err(BoundedCopyError::Io)?;
    if copied > limit {
        drop(out);
        let _ = fs::remove_file(target);
        return Err(BoundedCopyError::TooLarge);
    }
    Ok(())
}

/// Mark `path` as owner-executable (`0o755`)
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| InstallError::io(path, e))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_format_sha256_hex() {
        let empty_hash = Sha256::digest(b"");
        assert_eq!(
            format_sha256_hex(&empty_hash),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_file_hashes_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data");
        fs::write(&path, b"").unwrap();

        assert_eq!(
            sha256_file(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn verify_checksum_uses_first_token_case_insensitively() {
        let checksum = "ABCDEF0123  golangci-lint-1.55.2-linux-amd64.tar.gz\n";
        assert!(verify_checksum(checksum, "abcdef0123", "sum").is_ok());
        assert!(verify_checksum("  abcdef0123\n", " ABCDEF0123 ", "sum").is_ok());
    }

    #[test]
    fn verify_checksum_reports_mismatch() {
        let result = verify_checksum("deadbeef  file.tar.gz", "abcdef01", "sum");
        assert!(matches!(
            result,
            Err(InstallError::ChecksumMismatch { expected, actual })
                if expected == "deadbeef" && actual == "abcdef01"
        ));
    }

    #[test]
    fn verify_checksum_rejects_empty_file() {
        let result = verify_checksum(" \n", "abcdef01", "sum");
        assert!(matches!(result, Err(InstallError::EmptyChecksum(_))));
    }

    #[test]
    fn extract_artifact_writes_matching_entry_under_base_name() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("archive.tar.gz");
        write_archive(
            &archive,
            &[
                ("golangci-lint-1.55.2-linux-amd64/README.md", &b"readme"[..]),
                ("golangci-lint-1.55.2-linux-amd64/golangci-lint", &b"binary"[..]),
            ],
        );

        let target =
            extract_artifact(&archive, temp_dir.path(), "golangci-lint", 1024).unwrap();

        assert_eq!(target, temp_dir.path().join("golangci-lint"));
        assert_eq!(fs::read(&target).unwrap(), b"binary");
        assert!(!temp_dir.path().join("README.md").exists());
    }

    #[test]
    fn extract_artifact_fails_when_artifact_missing() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("archive.tar.gz");
        write_archive(&archive, &[("dist/LICENSE", &b"mit"[..])]);

        let result = extract_artifact(&archive, temp_dir.path(), "golangci-lint", 1024);

        assert!(matches!(result, Err(InstallError::ArtifactNotFound(_))));
    }

    #[test]
    fn extract_artifact_enforces_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("archive.tar.gz");
        write_archive(&archive, &[("dist/golangci-lint", &[0u8; 64][..])]);

        let result = extract_artifact(&archive, temp_dir.path(), "golangci-lint", 16);

        assert!(matches!(result, Err(InstallError::ArtifactTooLarge { limit: 16, .. })));
        assert!(!temp_dir.path().join("golangci-lint").exists());
    }

    #[test]
    fn extract_artifact_rejects_non_gzip_input() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("archive.tar.gz");
        fs::write(&archive, b"<html>not found</html>").unwrap();

        let result = extract_artifact(&archive, temp_dir.path(), "golangci-lint", 1024);

        assert!(matches!(result, Err(InstallError::Archive { .. })));
    }
}
