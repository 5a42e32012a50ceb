use super::Host;
use crate::Result;
use crate::timing::Stopwatch;
use clap::Parser;
use ohno::{IntoAppError, bail};
use std::io::Write;
use tokio::process::Command;

#[derive(Parser, Debug)]
pub struct TimeArgs {
    /// Command to run, followed by its arguments
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run a command and report how long it took.
pub async fn time_command<H: Host>(host: &mut H, args: &TimeArgs) -> Result<()> {
    let Some((program, rest)) = args.command.split_first() else {
        bail!("no command given");
    };

    let watch = Stopwatch::start();
    let status = Command::new(program)
        .args(rest)
        .status()
        .await
        .into_app_err_with(|| format!("could not run '{program}'"))?;

    let _ = writeln!(host.error(), "{}", watch.report(&args.command.join(" ")));

    if !status.success() {
        host.exit(status.code().unwrap_or(1));
    }

    Ok(())
}
