//! Utilities for interactive notebook sessions.
//!
//! The centerpiece is [`progress::ProgressBar`], a text progress bar with a scrolling
//! message log that works both on a terminal and inside a notebook output cell:
//!
//! ```no_run
//! use nbkit::progress::ProgressBar;
//!
//! # fn main() -> nbkit::Result<()> {
//! let mut bar = ProgressBar::new(1000)?;
//! for i in 0..1000 {
//!     bar.render(i, None)?;
//!     if i % 100 == 0 {
//!         bar.log(format!("checkpoint {i}"))?;
//!     }
//! }
//! bar.finalize()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`progress`]: the progress bar, its output sinks and rendering modes
//! - [`obfuscate`]: a toy symmetric string obfuscator
//! - [`notebook`]: figures and tables from notebook documents on disk
//! - [`sheet`]: published spreadsheets as CSV tables
//! - [`dev_paths`]: development checkouts on a search path
//! - [`git`]: commit count of a repository
//! - [`timing`]: stopwatch and duration formatting
//! - [`config`]: the `nbkit.toml` configuration file

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

mod commands;

pub mod config;
pub mod dev_paths;
pub mod git;
pub mod notebook;
pub mod obfuscate;
pub mod progress;
pub mod sheet;
pub mod timing;

pub use crate::commands::{Host, LogLevel, ModeArg, run};
