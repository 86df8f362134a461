//! Cache selection and deletion

use super::PipeContext;
use crate::api::{CacheApi, CacheEntry};
use crate::error::CacheGateResult;
use crate::ui;
use std::collections::HashSet;
use tracing::debug;

/// Pick the caches to delete
///
/// No target names selects every entry; otherwise only entries whose name
/// is a target, in listing order.
pub fn select_caches<'a>(entries: &'a [CacheEntry], targets: &[String]) -> Vec<&'a CacheEntry> {
    if targets.is_empty() {
        return entries.iter().collect();
    }

    let wanted: HashSet<&str> = targets.iter().map(String::as_str).collect();
    entries
        .iter()
        .filter(|entry| wanted.contains(entry.name.as_str()))
        .collect()
}

/// Target names that matched no listed cache
pub fn unmatched_targets<'a>(entries: &[CacheEntry], targets: &'a [String]) -> Vec<&'a str> {
    let names: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    targets
        .iter()
        .map(String::as_str)
        .filter(|target| !names.contains(target))
        .collect()
}

/// Select caches from a listing, reporting what was found
pub fn select_and_report<'a>(ctx: &PipeContext, entries: &'a [CacheEntry]) -> Vec<&'a CacheEntry> {
    for entry in entries {
        debug!("Listed cache {} ({})", entry.name, entry.uuid);
    }

    let targets = &ctx.config.caches;
    let selected = select_caches(entries, targets);

    if targets.is_empty() {
        ui::step_ok(&ctx.ui, &format!("Retrieved {} caches", entries.len()));
        if entries.is_empty() {
            ui::step_warn(&ctx.ui, "No caches were found!");
        }
    } else {
        ui::step_info(
            &ctx.ui,
            &format!("{} of {} caches selected", selected.len(), entries.len()),
        );
        for missing in unmatched_targets(entries, targets) {
            ui::step_warn(&ctx.ui, &format!("Cache {} not found", missing));
        }
    }

    selected
}

/// Delete caches one by one, stopping at the first failure
///
/// Caches deleted before a failure stay deleted.
pub fn clear_caches(
    ctx: &PipeContext,
    api: &dyn CacheApi,
    selected: &[&CacheEntry],
) -> CacheGateResult<usize> {
    let mut cleared = 0;
    for entry in selected {
        api.delete_cache(&ctx.config.repo, entry)?;
        ui::step_ok(&ctx.ui, &format!("Successfully cleared cache {}", entry.name));
        cleared += 1;
    }
    Ok(cleared)
}
