//! One pipe run: checksum gate, cache listing, selection, deletion and
//! checksum persistence
//!
//! ```text
//! Start -> GateCheck -> SkipExit
//!                    -> ListCaches -> SelectCaches -> DeleteCaches -> PersistChecksums -> SuccessExit
//! ```
//!
//! Any failure returns early; nothing is retried or rolled back.

pub mod select;

pub use select::{clear_caches, select_caches};

use crate::api::CacheApi;
use crate::checksum::{self, ChecksumStore};
use crate::config::RunConfig;
use crate::error::CacheGateResult;
use crate::ui::{self, UiContext};
use tracing::{debug, info};

/// Everything a run step needs: resolved configuration and output sink
#[derive(Debug, Clone)]
pub struct PipeContext {
    pub config: RunConfig,
    pub ui: UiContext,
}

impl PipeContext {
    pub fn new(config: RunConfig, ui: UiContext) -> Self {
        Self { config, ui }
    }
}

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Tracked files unchanged, no API calls made
    Skipped,
    /// Caches were listed and the selected ones deleted
    Cleared { cleared: usize, checksums: usize },
}

/// Execute the pipe against a cache API
pub fn run(ctx: &PipeContext, api: &dyn CacheApi) -> CacheGateResult<RunOutcome> {
    let config = &ctx.config;
    ui::intro(&ctx.ui, "Executing the pipe...");

    let tracked = checksum::scan_tracked_files(&config.clone_dir, &config.checksum_files)?;
    let store = ChecksumStore::new(config.checksum_dir());

    let decision = checksum::check(&store, &tracked)?;
    debug!("Checksum gate: {}", decision);
    if decision.should_skip() {
        ui::outro_success(&ctx.ui, "File(s) not changed. Skipping...");
        return Ok(RunOutcome::Skipped);
    }

    info!("Retrieving caches for {}", config.repo);
    let entries = api.list_caches(&config.repo)?;

    let selected = select::select_and_report(ctx, &entries);
    let cleared = clear_caches(ctx, api, &selected)?;

    let checksums = store.persist(&tracked)?;

    ui::outro_success(&ctx.ui, "Finished clearing caches");
    Ok(RunOutcome::Cleared { cleared, checksums })
}
