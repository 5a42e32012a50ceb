use super::Host;
use crate::Result;
use crate::git::git_version;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct GitVersionArgs {
    /// Repository to inspect
    #[arg(long, default_value = ".", value_name = "PATH")]
    pub repo: Utf8PathBuf,
}

pub async fn print_git_version<H: Host>(host: &mut H, args: &GitVersionArgs) -> Result<()> {
    let version = git_version(args.repo.as_std_path()).await?;
    let _ = writeln!(host.output(), "{version}");
    Ok(())
}
