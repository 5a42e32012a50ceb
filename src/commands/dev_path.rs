use super::Host;
use crate::Result;
use crate::config::Config;
use clap::Parser;
use ohno::IntoAppError;
use std::env;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct DevPathArgs {
    /// Development packages, as `repo/package`
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<String>,

    /// Environment variable holding the search path to extend
    #[arg(long, default_value = "PYTHONPATH", value_name = "NAME")]
    pub var: String,
}

/// Print the search path from `--var` with development checkouts injected.
pub fn print_dev_path<H: Host>(host: &mut H, config: &Config, args: &DevPathArgs) -> Result<()> {
    let mut search_path: Vec<_> = env::var_os(&args.var).map(|value| env::split_paths(&value).collect()).unwrap_or_default();

    let added = config.dev.inject(&mut search_path, &args.packages)?;
    log::info!("added {added} entries to {}", args.var);

    let joined = env::join_paths(&search_path).into_app_err("search path entry contains a separator")?;
    let _ = writeln!(host.output(), "{}", joined.to_string_lossy());
    Ok(())
}
