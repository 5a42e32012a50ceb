//! Rendering mode detection.
//!
//! A progress bar draws differently depending on where its output lands. A plain
//! terminal supports carriage returns and cursor movement, so the bar can be
//! rewritten in place. A notebook output cell cannot be partially erased, so the
//! whole cell is cleared and redrawn on every update.
//!
//! The mode is probed once when a bar is created and never re-checked.
//!
//! # Detection Priority
//!
//! 1. `NBKIT_RENDER_MODE=plain|notebook` - explicit override
//! 2. `EVCXR_IS_RUNTIME` - running inside the evcxr Jupyter kernel
//! 3. `JPY_PARENT_PID` - spawned by a Jupyter server
//! 4. Default: plain terminal

use std::env;
use strum::{Display, EnumString};

const LOG_TARGET: &str = "  progress";

/// Environment variable that forces a rendering mode.
pub const MODE_OVERRIDE_VAR: &str = "NBKIT_RENDER_MODE";

/// Environment variables whose presence indicates a notebook kernel.
const KERNEL_MARKERS: &[&str] = &["EVCXR_IS_RUNTIME", "JPY_PARENT_PID"];

/// How a progress bar emits its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RenderingMode {
    /// The process is attached to a notebook kernel; output cells are cleared and redrawn.
    #[strum(to_string = "interactive_notebook", serialize = "notebook")]
    InteractiveNotebook,

    /// Output goes to a regular terminal or stream.
    #[default]
    #[strum(to_string = "plain_terminal", serialize = "plain")]
    PlainTerminal,
}

impl RenderingMode {
    /// Probe the process environment for a notebook kernel.
    ///
    /// Never fails: anything unexpected falls back to [`RenderingMode::PlainTerminal`].
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|name| env::var(name).ok())
    }

    /// Detection with an injectable variable lookup.
    #[must_use]
    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(MODE_OVERRIDE_VAR) {
            match value.trim().parse::<Self>() {
                Ok(mode) => {
                    log::debug!(target: LOG_TARGET, "rendering mode forced to '{mode}' by {MODE_OVERRIDE_VAR}");
                    return mode;
                }
                Err(_) => log::warn!(target: LOG_TARGET, "ignoring unrecognized {MODE_OVERRIDE_VAR} value '{value}'"),
            }
        }

        if let Some(marker) = KERNEL_MARKERS.iter().find(|&&name| lookup(name).is_some()) {
            log::debug!(target: LOG_TARGET, "notebook kernel detected via {marker}");
            return Self::InteractiveNotebook;
        }

        Self::PlainTerminal
    }

    #[must_use]
    pub const fn is_notebook(self) -> bool {
        matches!(self, Self::InteractiveNotebook)
    }
}
