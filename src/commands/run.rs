//! Command dispatch logic for nbkit

use super::common::GlobalArgs;
use super::dev_path::{DevPathArgs, print_dev_path};
use super::git_version::{GitVersionArgs, print_git_version};
use super::init::{InitArgs, init_config};
use super::notebook::{FigureArgs, OutputsArgs, TableArgs, extract_figure, extract_table, list_outputs};
use super::obfuscate::{DecryptArgs, EncryptArgs, run_decrypt, run_encrypt};
use super::progress::{ProgressArgs, run_progress};
use super::sheet::{SheetArgs, print_sheet};
use super::time::{TimeArgs, time_command};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "nbkit", version, about, author, long_about = None)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: NbkitSubcommand,
}

#[derive(Subcommand, Debug)]
enum NbkitSubcommand {
    /// Run a progress bar through a timed loop
    Progress(ProgressArgs),
    /// Obfuscate a string
    Encrypt(EncryptArgs),
    /// Reveal an obfuscated string
    Decrypt(DecryptArgs),
    /// List the outputs of a notebook cell
    Outputs(OutputsArgs),
    /// Save a figure output of a notebook cell as PNG
    Figure(FigureArgs),
    /// Print a table (HTML) output of a notebook cell
    Table(TableArgs),
    /// Fetch a Google spreadsheet and print it as CSV
    Sheet(SheetArgs),
    /// Print a search path with development checkouts injected
    DevPath(DevPathArgs),
    /// Print the number of commits in the current branch
    GitVersion(GitVersionArgs),
    /// Run a command and report how long it took
    Time(TimeArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    let config = cli.global.setup()?;

    match &cli.command {
        NbkitSubcommand::Progress(args) => run_progress(host, config, args).await,
        NbkitSubcommand::Encrypt(args) => run_encrypt(host, args),
        NbkitSubcommand::Decrypt(args) => run_decrypt(host, args),
        NbkitSubcommand::Outputs(args) => list_outputs(host, args),
        NbkitSubcommand::Figure(args) => extract_figure(host, args),
        NbkitSubcommand::Table(args) => extract_table(host, args),
        NbkitSubcommand::Sheet(args) => print_sheet(host, &config, args).await,
        NbkitSubcommand::DevPath(args) => print_dev_path(host, &config, args),
        NbkitSubcommand::GitVersion(args) => print_git_version(host, args).await,
        NbkitSubcommand::Time(args) => time_command(host, args).await,
        NbkitSubcommand::Init(args) => init_config(host, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nbkit", "encrypt", "x", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.global.log_level, crate::commands::LogLevel::Debug);
    }

    #[test]
    fn test_time_takes_trailing_arguments() {
        let cli = Cli::try_parse_from(["nbkit", "time", "--", "ls", "-la"]).unwrap();
        let NbkitSubcommand::Time(args) = cli.command else {
            panic!("expected time command");
        };
        assert_eq!(args.command, ["ls", "-la"]);
    }
}
