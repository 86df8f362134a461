//! cachegate - pipeline cache clearing step
//!
//! CLI entry point: resolves configuration and runs the pipe once.

use cachegate::api::BitbucketClient;
use cachegate::cli::{Cli, LogFormat};
use cachegate::config;
use cachegate::error::CacheGateResult;
use cachegate::pipe::{self, PipeContext, RunOutcome};
use cachegate::ui::UiContext;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> CacheGateResult<()> {
    let cli = Cli::parse();

    // Initialize logging: info by default, debug with -v or DEBUG=true
    let filter = if cli.debug_enabled() {
        EnvFilter::new("cachegate=debug")
    } else {
        EnvFilter::new("cachegate=info")
    };

    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }

    let config = config::load_run_config(&cli)?;
    let client = BitbucketClient::new(&config.api_url, &config.credentials);
    let ctx = PipeContext::new(config, UiContext::detect());

    match pipe::run(&ctx, &client)? {
        RunOutcome::Skipped => debug!("Run skipped, tracked files unchanged"),
        RunOutcome::Cleared { cleared, checksums } => {
            debug!("Cleared {} caches, stored {} checksums", cleared, checksums)
        }
    }

    Ok(())
}
