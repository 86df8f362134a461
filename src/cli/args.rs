//! CLI argument definitions using clap derive
//!
//! Every input can also come from the environment, which is how
//! Bitbucket Pipelines passes variables to a pipe.

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// cachegate - clear Bitbucket Pipelines caches when tracked files change
///
/// Compares checksums of tracked files against the previous run and, when
/// something changed, deletes the repository's pipeline caches.
#[derive(Parser, Debug, Default)]
#[command(name = "cachegate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bitbucket account username
    #[arg(long, env = "BITBUCKET_USERNAME")]
    pub username: Option<String>,

    /// Bitbucket app password
    #[arg(long, env = "BITBUCKET_APP_PASSWORD", hide_env_values = true)]
    pub app_password: Option<String>,

    /// Workspace owning the repository [default: $BITBUCKET_WORKSPACE]
    #[arg(long, env = "WORKSPACE")]
    pub workspace: Option<String>,

    /// Repository slug [default: $BITBUCKET_REPO_SLUG]
    #[arg(long, env = "REPO_SLUG")]
    pub repo_slug: Option<String>,

    /// Names of caches to clear (comma-separated, all caches if empty)
    #[arg(long, env = "CACHES", value_delimiter = ',')]
    pub caches: Vec<String>,

    /// Files whose checksums decide whether to clear (comma-separated)
    #[arg(long, env = "CHECKSUM_FILES", value_delimiter = ',')]
    pub checksum_files: Vec<String>,

    /// Repository clone directory [default: current directory]
    #[arg(long, env = "BITBUCKET_CLONE_DIR")]
    pub clone_dir: Option<PathBuf>,

    /// Repositories API base URL
    #[arg(long, env = "BITBUCKET_API_URL")]
    pub api_url: Option<String>,

    /// Configuration file path [default: <clone dir>/.cachegate.toml]
    #[arg(short, long, env = "CACHEGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Whether debug logging was requested by flag or environment
    pub fn debug_enabled(&self) -> bool {
        self.debug || self.verbose > 0
    }
}

/// Log output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// JSON lines
    Json,
}
