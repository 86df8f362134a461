//! Configuration loading and resolution
//!
//! Precedence, highest first: command-line flag or its environment
//! variable, Bitbucket indexed array variables (`NAME_COUNT`, `NAME_0`..),
//! the TOML config file, then ambient Bitbucket defaults.

pub mod schema;

pub use schema::{Credentials, FileConfig, RunConfig};

use crate::api::{RepoRef, DEFAULT_API_URL};
use crate::cli::Cli;
use crate::error::{CacheGateError, CacheGateResult};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Config file name discovered in the clone directory
pub const LOCAL_CONFIG_FILE: &str = ".cachegate.toml";

/// Configuration file loader
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a config manager that discovers the local config file
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a config manager with an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Find `.cachegate.toml` in the clone directory
    pub fn find_local_config(clone_dir: &Path) -> Option<PathBuf> {
        let candidate = clone_dir.join(LOCAL_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Load the file configuration
    ///
    /// An explicit path must exist; a missing local file yields defaults.
    pub fn load(&self, clone_dir: &Path) -> CacheGateResult<FileConfig> {
        let path = match self.config_path {
            Some(ref path) if !path.exists() => {
                return Err(CacheGateError::ConfigNotFound(path.clone()))
            }
            Some(ref path) => path.clone(),
            None => match Self::find_local_config(clone_dir) {
                Some(path) => path,
                None => {
                    debug!("No {} found, using defaults", LOCAL_CONFIG_FILE);
                    return Ok(FileConfig::default());
                }
            },
        };

        debug!("Loading config from {}", path.display());
        Self::load_from_file(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> CacheGateResult<FileConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            CacheGateError::io(format!("reading config from {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| CacheGateError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the run configuration from the CLI, config file and process env
pub fn load_run_config(cli: &Cli) -> CacheGateResult<RunConfig> {
    let clone_dir = match cli.clone_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| CacheGateError::io("getting current directory", e))?,
    };

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let file = manager.load(&clone_dir)?;

    resolve(cli, file, clone_dir, |key| std::env::var(key).ok())
}

/// Merge all configuration sources and validate the result
///
/// `env` looks up variables that clap does not bind directly: ambient
/// defaults and indexed array variables.
pub fn resolve<F>(cli: &Cli, file: FileConfig, clone_dir: PathBuf, env: F) -> CacheGateResult<RunConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.is_empty());

    // Credentials first: a pipe without them must fail before any other check.
    let username = non_empty(cli.username.clone()).ok_or(CacheGateError::ConfigMissing {
        name: "BITBUCKET_USERNAME",
    })?;
    let app_password =
        non_empty(cli.app_password.clone()).ok_or(CacheGateError::ConfigMissing {
            name: "BITBUCKET_APP_PASSWORD",
        })?;

    let workspace = non_empty(cli.workspace.clone())
        .or(file.workspace)
        .or_else(|| env("BITBUCKET_WORKSPACE"))
        .ok_or(CacheGateError::ConfigMissing { name: "WORKSPACE" })?;
    let slug = non_empty(cli.repo_slug.clone())
        .or(file.repo_slug)
        .or_else(|| env("BITBUCKET_REPO_SLUG"))
        .ok_or(CacheGateError::ConfigMissing { name: "REPO_SLUG" })?;

    let caches = pick_list(
        list_values(&cli.caches),
        indexed_list(&env, "CACHES")?.map(|v| list_values(&v)),
        list_values(&file.caches),
    );
    let to_paths = |values: Vec<String>| values.into_iter().map(PathBuf::from).collect::<Vec<_>>();
    let checksum_files = pick_list(
        to_paths(list_values(&cli.checksum_files)),
        indexed_list(&env, "CHECKSUM_FILES")?.map(|v| to_paths(list_values(&v))),
        file.checksum_files
            .into_iter()
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
    );
    for path in &checksum_files {
        validate_tracked_path(path)?;
    }

    let api_url = non_empty(cli.api_url.clone())
        .or(file.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
        return Err(CacheGateError::ConfigValue {
            name: "BITBUCKET_API_URL",
            reason: format!("'{}' is not an http(s) URL", api_url),
        });
    }

    let config = RunConfig {
        credentials: Credentials::new(username, app_password),
        repo: RepoRef { workspace, slug },
        caches,
        checksum_files,
        clone_dir,
        api_url,
    };
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trimmed list entries with blank segments dropped
///
/// Pipelines pass unset optional variables as empty strings, and a
/// trailing comma yields an empty segment; neither counts as a value.
fn list_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// First non-empty list in precedence order
fn pick_list<T>(flag: Vec<T>, indexed: Option<Vec<T>>, file: Vec<T>) -> Vec<T> {
    if !flag.is_empty() {
        return flag;
    }
    match indexed {
        Some(list) if !list.is_empty() => list,
        _ => file,
    }
}

/// Read a Bitbucket array variable passed as `NAME_COUNT` + `NAME_<i>`
fn indexed_list<F>(env: &F, name: &'static str) -> CacheGateResult<Option<Vec<String>>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(count) = env(&format!("{}_COUNT", name)) else {
        return Ok(None);
    };
    let count: usize = count.trim().parse().map_err(|_| CacheGateError::ConfigValue {
        name,
        reason: format!("{}_COUNT must be a number, got '{}'", name, count),
    })?;

    (0..count)
        .map(|i| {
            env(&format!("{}_{}", name, i)).ok_or_else(|| CacheGateError::ConfigValue {
                name,
                reason: format!("{}_{} is not set", name, i),
            })
        })
        .collect::<CacheGateResult<Vec<_>>>()
        .map(Some)
}

/// Tracked paths must stay inside the clone and checksum directories
fn validate_tracked_path(path: &Path) -> CacheGateResult<()> {
    let invalid = |reason: &str| CacheGateError::PathInvalid {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("must not contain '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the clone directory"))
            }
        }
    }
    Ok(())
}
