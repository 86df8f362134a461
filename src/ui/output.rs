//! Pipe status lines
//!
//! Every line has a level. Pipelines get a bracketed tag per level
//! (`[OK] Finished clearing caches`); interactive terminals get the
//! matching `cliclack` log call.

use super::context::UiContext;
use console::{style, StyledObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Banner,
    Done,
    Ok,
    Info,
    Warn,
}

impl Level {
    fn tag(self) -> Option<StyledObject<&'static str>> {
        match self {
            Self::Banner => None,
            Self::Done => Some(style("[OK]").green().bold()),
            Self::Ok => Some(style("[OK]").green()),
            Self::Info => Some(style("[INFO]").cyan()),
            Self::Warn => Some(style("[WARN]").yellow()),
        }
    }

    /// Banner and final lines sit flush left, steps are indented
    fn indent(self) -> &'static str {
        match self {
            Self::Banner | Self::Done => "",
            Self::Ok | Self::Info | Self::Warn => "  ",
        }
    }

    fn plain_line(self, message: &str) -> String {
        match self.tag() {
            Some(tag) => format!("{}{} {}", self.indent(), tag, message),
            None => style(message).cyan().bold().to_string(),
        }
    }
}

fn emit(ctx: &UiContext, level: Level, message: &str) {
    if !ctx.use_fancy_output() {
        println!("{}", level.plain_line(message));
        return;
    }

    // Terminal rendering errors are not worth failing a run over.
    let _ = match level {
        Level::Banner => cliclack::intro(style(message).cyan().bold()),
        Level::Done => cliclack::outro(style(message).green().bold()),
        Level::Ok => cliclack::log::success(message),
        Level::Info => cliclack::log::info(message),
        Level::Warn => cliclack::log::warning(message),
    };
}

/// Run banner
pub fn intro(ctx: &UiContext, title: &str) {
    emit(ctx, Level::Banner, title);
}

/// Final line of a successful run
pub fn outro_success(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Done, message);
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Ok, message);
}

pub fn step_warn(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Warn, message);
}

pub fn step_info(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Info, message);
}
