//! Bitbucket Cloud pipelines-config caches client

use super::{CacheApi, CacheEntry, RepoRef};
use crate::config::Credentials;
use crate::error::{CacheGateError, CacheGateResult};
use base64::prelude::*;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Bitbucket Cloud repositories endpoint
pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0/repositories";

/// Number of caches requested from the single listed page
pub const PAGE_LEN: u32 = 100;

const USER_AGENT: &str = concat!("cachegate/", env!("CARGO_PKG_VERSION"));

/// Paginated list response; only the first page is read
#[derive(Debug, Deserialize)]
struct CachePage {
    values: Vec<CacheEntry>,
}

/// Blocking client for the caches endpoints
pub struct BitbucketClient {
    agent: Agent,
    base_url: String,
    authorization: String,
}

impl BitbucketClient {
    /// Create a client for `base_url` authenticating with basic auth
    pub fn new(base_url: &str, credentials: &Credentials) -> Self {
        // Non-success statuses are returned as responses so their bodies
        // can be reported.
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(60)))
            .build()
            .into();

        let token = BASE64_STANDARD.encode(format!(
            "{}:{}",
            credentials.username,
            credentials.app_password()
        ));

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", token),
        }
    }

    fn caches_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/{}/{}/pipelines-config/caches/",
            self.base_url, repo.workspace, repo.slug
        )
    }

    /// URL of the single page listing caches
    pub fn list_url(&self, repo: &RepoRef) -> String {
        format!("{}?page=1&pagelen={}", self.caches_url(repo), PAGE_LEN)
    }

    /// URL addressing one cache
    ///
    /// Bitbucket UUIDs are wrapped in braces, which are escaped here.
    pub fn delete_url(&self, repo: &RepoRef, uuid: &str) -> String {
        let escaped = uuid.replace('{', "%7B").replace('}', "%7D");
        format!("{}{}", self.caches_url(repo), escaped)
    }
}

impl CacheApi for BitbucketClient {
    fn list_caches(&self, repo: &RepoRef) -> CacheGateResult<Vec<CacheEntry>> {
        let url = self.list_url(repo);
        debug!("GET {}", url);

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()?;

        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        debug!("GET {} -> {}: {}", url, status.as_u16(), body);

        if !status.is_success() {
            return Err(CacheGateError::CacheList {
                status: status.as_u16(),
                body,
                url,
            });
        }

        let page: CachePage = serde_json::from_str(&body)?;
        Ok(page.values)
    }

    fn delete_cache(&self, repo: &RepoRef, entry: &CacheEntry) -> CacheGateResult<()> {
        let url = self.delete_url(repo, &entry.uuid);
        debug!("DELETE {} ({})", url, entry.name);

        let mut response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.authorization)
            .header("User-Agent", USER_AGENT)
            .call()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.body_mut().read_to_string()?;
        debug!("DELETE {} -> {}: {}", url, status.as_u16(), body);
        Err(CacheGateError::CacheDelete {
            name: entry.name.clone(),
            body,
        })
    }
}
