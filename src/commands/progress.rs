use super::Host;
use crate::Result;
use crate::config::Config;
use crate::progress::{ProgressBar, RenderingMode, sink_for};
use clap::{Parser, ValueEnum};
use core::time::Duration;
use ohno::IntoAppError;

/// Where the progress bar should assume its output is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Detect a notebook kernel from the environment
    Auto,

    /// Rewrite the bar in place on a terminal
    Plain,

    /// Clear and redraw the whole output cell
    Notebook,
}

impl ModeArg {
    fn resolve(self) -> RenderingMode {
        match self {
            Self::Auto => RenderingMode::detect(),
            Self::Plain => RenderingMode::PlainTerminal,
            Self::Notebook => RenderingMode::InteractiveNotebook,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ProgressArgs {
    /// Number of steps to run
    #[arg(long, default_value_t = 20, value_name = "N")]
    pub steps: u64,

    /// Pause between steps, in milliseconds
    #[arg(long, default_value_t = 50, value_name = "MS")]
    pub delay_ms: u64,

    /// Log a message every K steps
    #[arg(long, value_name = "K")]
    pub log_every: Option<u64>,

    /// Status shown after the label (overrides the configuration)
    #[arg(long)]
    pub status: Option<String>,

    /// Rendering mode
    #[arg(long, value_name = "MODE", default_value = "auto")]
    pub mode: ModeArg,
}

/// Drive a progress bar through a timed loop, then print the log.
pub async fn run_progress<H: Host>(host: &mut H, config: Config, args: &ProgressArgs) -> Result<()> {
    let mut options = config.progress;
    if let Some(status) = &args.status {
        options.status.clone_from(status);
    }

    let delay = Duration::from_millis(args.delay_ms);
    let mut out = host.output();
    let mut bar = ProgressBar::with_sink(args.steps, options, sink_for(args.mode.resolve(), &mut out))?;

    for step in 0..args.steps {
        bar.render(step, None).into_app_err("writing progress bar")?;

        if let Some(every) = args.log_every
            && every > 0
            && step > 0
            && step % every == 0
        {
            bar.log(format!("reached step {step}")).into_app_err("writing progress log")?;
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    bar.finalize().into_app_err("writing progress bar")
}
