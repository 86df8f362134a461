//! Skip detection: compare fresh checksums against stored records

use super::{ChecksumStore, TrackedFile};
use crate::error::CacheGateResult;
use std::fmt;
use tracing::{debug, info};

/// Outcome of the checksum gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Checksum directory did not exist; it has now been created
    NoPriorState,
    /// At least one record differs, or nothing could be compared
    Changed,
    /// Every comparable tracked file matches its record
    Unchanged,
}

impl GateDecision {
    /// Whether cache clearing should be skipped
    pub fn should_skip(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoPriorState => "no prior state",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{}", name)
    }
}

/// Run the gate over freshly scanned tracked files
///
/// A tracked file only takes part in the decision when both its source
/// and its stored record exist. With an empty tracked list, or no
/// comparable file, the decision is `Changed`.
pub fn check(store: &ChecksumStore, files: &[TrackedFile]) -> CacheGateResult<GateDecision> {
    if !store.exists() {
        debug!(
            "Checksum directory {} missing, creating it",
            store.root().display()
        );
        store.create()?;
        return Ok(GateDecision::NoPriorState);
    }

    let mut compared = 0;
    let mut all_equal = true;

    for file in files {
        let Some(ref new_checksum) = file.checksum else {
            continue;
        };
        let Some(old_checksum) = store.load(&file.path)? else {
            debug!("No checksum record for {}", file.path.display());
            continue;
        };

        info!(
            "file: {}, old checksum: {}, new checksum: {}",
            file.path.display(),
            old_checksum,
            new_checksum
        );
        compared += 1;
        all_equal &= old_checksum == *new_checksum;
    }

    if compared > 0 && all_equal {
        Ok(GateDecision::Unchanged)
    } else {
        Ok(GateDecision::Changed)
    }
}
