//! Putting development checkouts ahead of installed packages on a search path.

use crate::Result;
use directories::BaseDirs;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_TARGET: &str = "       dev";

/// Location of development checkouts, relative to the home directory.
pub const DEFAULT_DEV_DIR: &str = "Dropbox/dev";

/// Where development checkouts live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct DevPaths {
    /// Directory holding `repo/package` checkouts (default is `~/Dropbox/dev`)
    pub root: Option<PathBuf>,

    /// Extra package directory appended to the search path when it exists
    pub site_packages: Option<PathBuf>,
}

impl DevPaths {
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self {
            root: Some(root),
            site_packages: None,
        }
    }

    #[must_use]
    pub fn with_site_packages(mut self, dir: impl Into<PathBuf>) -> Self {
        self.site_packages = Some(dir.into());
        self
    }

    /// The configured root, or `~/Dropbox/dev`.
    pub fn root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }

        let dirs = BaseDirs::new().into_app_err("could not determine home directory")?;
        Ok(dirs.home_dir().join(DEFAULT_DEV_DIR))
    }

    /// Insert the checkout directory of each `repo/package` into `search_path`.
    ///
    /// Checkouts go right after the first entry, in the order given, so they win over
    /// anything installed. A package is skipped when an entry with the same final
    /// component is already present. Returns how many entries were added.
    pub fn inject(&self, search_path: &mut Vec<PathBuf>, packages: &[impl AsRef<str>]) -> Result<usize> {
        let mut added = 0;

        if let Some(site) = &self.site_packages {
            if site.is_dir() && !search_path.contains(site) {
                search_path.push(site.clone());
                added += 1;
            } else {
                log::debug!(target: LOG_TARGET, "not adding site packages '{}'", site.display());
            }
        }

        let root = self.root()?;
        let mut position = search_path.len().min(1);
        for package in packages {
            let package = package.as_ref().trim_matches('/');
            let checkout = root.join(package);
            let Some(name) = checkout.file_name() else {
                log::warn!(target: LOG_TARGET, "ignoring development package '{package}' with no name");
                continue;
            };

            if search_path.iter().any(|entry| entry.file_name() == Some(name)) {
                log::debug!(target: LOG_TARGET, "'{package}' is already on the search path");
                continue;
            }

            log::debug!(target: LOG_TARGET, "adding development checkout '{}'", checkout.display());
            search_path.insert(position, checkout);
            position += 1;
            added += 1;
        }

        Ok(added)
    }
}
