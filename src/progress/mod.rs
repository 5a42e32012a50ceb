//! Console progress bar for long-running loops.
//!
//! # Implementation Model
//!
//! A [`ProgressBar`] owns its output through the [`OutputSink`] trait. Two sinks
//! exist, matching the two [`RenderingMode`]s:
//!
//! - [`PlainSink`]: a character stream. The bar is rewritten in place with carriage
//!   returns, and log lines below it are reached with cursor movement.
//! - [`NotebookSink`]: a notebook output cell. The cell is cleared and fully redrawn
//!   on every update, with a short scrollback of recent log lines.
//!
//! The mode is probed once, when the bar is created, by [`RenderingMode::detect`].
//! Presentation settings live in [`ProgressOptions`], which can also be loaded from
//! the `[progress]` section of the configuration file.

mod bar;
mod mode;
mod options;
mod sink;

pub use bar::{CURSOR_UP_LINE, ERASE_BELOW, ERASE_TO_EOL, ProgressBar, compose_bar, compose_line, fill_template, percent};
pub use mode::{MODE_OVERRIDE_VAR, RenderingMode};
pub use options::{
    DEFAULT_BAR_WIDTH, DEFAULT_FILL_CHARACTER, DEFAULT_LABEL_TEMPLATE, DEFAULT_SCROLLBACK, MIN_BAR_WIDTH, ProgressOptions,
};
pub use sink::{CLEAR_CELL, NotebookSink, OutputSink, PlainSink, sink_for};
