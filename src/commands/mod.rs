//! Command-line interface for nbkit
//!
//! Each command is a thin layer over one library module: it parses its
//! arguments with clap, calls into the library, and writes results through the
//! [`Host`] so that tests can capture output.
//!
//! The `common` module provides the global flags, logging setup and
//! configuration loading shared by all commands.

mod common;
mod dev_path;
mod git_version;
mod host;
mod init;
mod notebook;
mod obfuscate;
mod progress;
mod run;
mod sheet;
mod time;

pub use common::LogLevel;
pub use host::Host;
pub use progress::ModeArg;
pub use run::run;
