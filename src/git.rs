use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of commits reachable from `HEAD`, usable as a simple increasing version.
pub async fn git_version(repo_path: &Path) -> Result<u64> {
    let path_str = repo_path.to_str().into_app_err("invalid UTF-8 in repository path")?;
    let output = run_git_with_timeout(&["-C", path_str, "rev-list", "--count", "HEAD"]).await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git rev-list failed: {}", stderr.trim());
    }

    parse_count(&String::from_utf8_lossy(&output.stdout))
}

fn parse_count(stdout: &str) -> Result<u64> {
    let trimmed = stdout.trim();
    trimmed
        .parse::<u64>()
        .into_app_err_with(|| format!("unexpected commit count '{trimmed}'"))
}

async fn run_git_with_timeout(args: &[&str]) -> Result<Output> {
    let child = Command::new("git")
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn git command")?;

    match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
        Err(_) => {
            bail!("'git {}' timed out after {} seconds", args.join(" "), GIT_TIMEOUT.as_secs());
        }
    }
}
