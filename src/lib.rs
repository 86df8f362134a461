//! cachegate - Bitbucket Pipelines cache clearing gated by file checksums
//!
//! Hashes tracked files, compares them with the checksums stored by the
//! previous run, and only when something changed lists the repository's
//! pipeline caches and deletes the selected ones.

pub mod api;
pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipe;
pub mod ui;

pub use error::{CacheGateError, CacheGateResult};
