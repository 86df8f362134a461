//! On-disk checksum records, one file per tracked path

use super::TrackedFile;
use crate::error::{CacheGateError, CacheGateResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Checksum records rooted at a directory
#[derive(Debug, Clone)]
pub struct ChecksumStore {
    root: PathBuf,
}

impl ChecksumStore {
    /// Create a store rooted at `root` (nothing is touched on disk)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the store directory exists
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Create the store directory
    pub fn create(&self) -> CacheGateResult<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            CacheGateError::io(
                format!("creating checksum directory {}", self.root.display()),
                e,
            )
        })
    }

    /// Path of the record for a tracked path
    pub fn record_path(&self, tracked: &Path) -> PathBuf {
        self.root.join(tracked)
    }

    /// Read the stored checksum for a tracked path, `None` if no record exists
    pub fn load(&self, tracked: &Path) -> CacheGateResult<Option<String>> {
        let path = self.record_path(tracked);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheGateError::io(
                format!("reading checksum record {}", path.display()),
                e,
            )),
        }
    }

    /// Write a checksum record, creating parent directories as needed
    pub fn save(&self, tracked: &Path, checksum: &str) -> CacheGateResult<()> {
        let path = self.record_path(tracked);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CacheGateError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        fs::write(&path, checksum).map_err(|e| {
            CacheGateError::io(format!("writing checksum record {}", path.display()), e)
        })?;
        debug!("Wrote checksum record {}", path.display());
        Ok(())
    }

    /// Persist fresh checksums for every tracked file that exists
    pub fn persist(&self, files: &[TrackedFile]) -> CacheGateResult<usize> {
        let mut written = 0;
        for file in files {
            if let Some(ref checksum) = file.checksum {
                self.save(&file.path, checksum)?;
                info!("Caching {}, checksum: {}", file.path.display(), checksum);
                written += 1;
            }
        }
        Ok(written)
    }
}
