//! Configuration schema for cachegate
//!
//! An optional file at `<clone dir>/.cachegate.toml` supplies defaults for
//! the non-secret settings. Credentials only come from flags or the
//! environment.

use crate::api::RepoRef;
use crate::checksum::CHECKSUM_DIR_NAME;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// File configuration; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Workspace owning the repository
    pub workspace: Option<String>,

    /// Repository slug
    pub repo_slug: Option<String>,

    /// Cache names to clear
    pub caches: Vec<String>,

    /// Files whose checksums gate the run
    pub checksum_files: Vec<PathBuf>,

    /// Repositories API base URL
    pub api_url: Option<String>,
}

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    app_password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            app_password: app_password.into(),
        }
    }

    pub fn app_password(&self) -> &str {
        &self.app_password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("app_password", &"<redacted>")
            .finish()
    }
}

/// Fully resolved, validated configuration for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub credentials: Credentials,
    pub repo: RepoRef,
    /// Cache names to clear; empty means all caches
    pub caches: Vec<String>,
    /// Tracked paths, relative to `clone_dir`
    pub checksum_files: Vec<PathBuf>,
    pub clone_dir: PathBuf,
    pub api_url: String,
}

impl RunConfig {
    /// Directory holding checksum records
    pub fn checksum_dir(&self) -> PathBuf {
        self.clone_dir.join(CHECKSUM_DIR_NAME)
    }
}
