//! Tracked file hashing

use crate::error::{CacheGateError, CacheGateResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A tracked file and its current content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Path relative to the clone directory
    pub path: PathBuf,
    /// Hex SHA-256 of the file contents, `None` when the file is missing
    pub checksum: Option<String>,
}

impl TrackedFile {
    /// Whether the source file existed when scanned
    pub fn exists(&self) -> bool {
        self.checksum.is_some()
    }
}

/// Hash a file's contents using SHA256, returning the full hex digest
pub fn hash_file_contents(path: &Path) -> CacheGateResult<String> {
    let contents = fs::read(path)
        .map_err(|e| CacheGateError::io(format!("reading tracked file {}", path.display()), e))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}

/// Hash every tracked path under `clone_dir`
///
/// Paths that don't point to a regular file are kept with no checksum so
/// later steps can tell "missing" apart from "unchanged".
pub fn scan_tracked_files(clone_dir: &Path, paths: &[PathBuf]) -> CacheGateResult<Vec<TrackedFile>> {
    let mut tracked = Vec::with_capacity(paths.len());

    for path in paths {
        let source = clone_dir.join(path);
        let checksum = if source.is_file() {
            Some(hash_file_contents(&source)?)
        } else {
            debug!("Tracked file not found: {}", source.display());
            None
        };
        tracked.push(TrackedFile {
            path: path.clone(),
            checksum,
        });
    }

    Ok(tracked)
}
