//! Checksum-based change detection for tracked files
//!
//! Each tracked file is hashed (SHA-256 over its raw bytes) and the hex
//! digest is stored under the checksum directory, mirroring the tracked
//! file's relative path. The next run compares fresh digests against
//! those records to decide whether cache clearing can be skipped.
//!
//! # Skip Rules
//!
//! | Checksum dir | Comparisons made | All equal | Decision |
//! |--------------|------------------|-----------|----------|
//! | missing | - | - | NoPriorState (dir created) |
//! | present | 0 | - | Changed |
//! | present | >0 | no | Changed |
//! | present | >0 | yes | Unchanged |

pub mod gate;
pub mod store;
pub mod tracked;

pub use gate::{check, GateDecision};
pub use store::ChecksumStore;
pub use tracked::{hash_file_contents, scan_tracked_files, TrackedFile};

/// Directory name, relative to the clone dir, holding checksum records
pub const CHECKSUM_DIR_NAME: &str = ".cache_checksum";
