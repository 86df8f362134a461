//! Remote pipeline cache API
//!
//! `CacheApi` is the seam between the run logic and the provider's REST
//! API, so the run can be exercised without a network.

mod bitbucket;

pub use bitbucket::{BitbucketClient, DEFAULT_API_URL, PAGE_LEN};

use crate::error::CacheGateResult;
use serde::Deserialize;
use std::fmt;

/// A pipeline cache as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheEntry {
    /// Provider identifier, e.g. `{6d3c...}`
    pub uuid: String,
    /// Cache name as declared in the pipeline definition
    pub name: String,
}

/// Workspace/repository pair identifying the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub workspace: String,
    pub slug: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.slug)
    }
}

/// Operations on a repository's pipeline caches
pub trait CacheApi {
    /// List caches of a repository (first page only)
    fn list_caches(&self, repo: &RepoRef) -> CacheGateResult<Vec<CacheEntry>>;

    /// Delete one cache by its identifier
    fn delete_cache(&self, repo: &RepoRef, entry: &CacheEntry) -> CacheGateResult<()>;
}
