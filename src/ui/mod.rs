//! User-facing run output
//!
//! Pipeline logs get plain `[OK]`/`[WARN]` prefixed lines; an interactive
//! terminal gets `cliclack` styling. Diagnostics go through `tracing`
//! instead.

mod context;
mod output;

pub use context::UiContext;
pub use output::{intro, outro_success, step_info, step_ok, step_warn};
