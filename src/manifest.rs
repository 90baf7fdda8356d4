//! Manifest Checker: parses a file-digest manifest and verifies every listed
//! file against its recorded SHA-256.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::VerifyError;

/// The manifest must never list itself, under this reserved name.
pub const MANIFEST_SELF_NAME: &str = "MANIFEST.sha256";

/// Chunk size used when streaming a file for digest recomputation.
const HASH_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub digest: String,
    pub path: String,
}

/// Parse the manifest text format: `<64-hex digest><two spaces><relative path>`.
pub fn parse_manifest(content: &str) -> Result<Vec<ManifestEntry>, VerifyError> {
    let mut entries = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (digest, path) = line.split_once("  ").ok_or_else(|| VerifyError::ManifestMalformed {
            detail: format!("missing digest/path separator in line: {line:?}"),
        })?;

        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(VerifyError::ManifestMalformed {
                detail: format!("invalid digest '{digest}': expected 64 hex characters"),
            });
        }

        if path.is_empty() {
            return Err(VerifyError::ManifestMalformed {
                detail: "manifest entry has an empty path".to_string(),
            });
        }

        let normalized = path.replace('\\', "/");
        if normalized == MANIFEST_SELF_NAME {
            return Err(VerifyError::ManifestSelfReference { path: normalized });
        }

        entries.push(ManifestEntry {
            digest: digest.to_ascii_lowercase(),
            path: normalized,
        });
    }

    if entries.is_empty() {
        return Err(VerifyError::ManifestMalformed {
            detail: "manifest contains no entries".to_string(),
        });
    }

    Ok(entries)
}

/// SHA-256 of a file's contents, read in fixed-size chunks so large files
/// never need to be fully buffered in memory.
pub fn hash_file_streaming(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Verify every entry in `manifest_path` against files under `bundle_dir`.
///
/// Files present in the directory but absent from the manifest are not
/// errors; the manifest is a whitelist, not a tight set.
pub fn check_manifest(bundle_dir: &Path, manifest_path: &Path) -> Result<(), VerifyError> {
    let content = std::fs::read_to_string(manifest_path).map_err(|e| VerifyError::ManifestMalformed {
        detail: format!("cannot read manifest: {e}"),
    })?;

    let entries = parse_manifest(&content)?;

    for entry in &entries {
        let full_path = bundle_dir.join(&entry.path);

        if !full_path.is_file() {
            return Err(VerifyError::ManifestMissingFile {
                path: entry.path.clone(),
            });
        }

        let actual = hash_file_streaming(&full_path).map_err(|e| VerifyError::ManifestMalformed {
            detail: format!("cannot read '{}': {e}", entry.path),
        })?;

        if actual != entry.digest {
            return Err(VerifyError::ManifestHashMismatch {
                path: entry.path.clone(),
                expected: entry.digest.clone(),
                actual,
            });
        }
    }

    Ok(())
}
