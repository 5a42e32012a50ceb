use crate::Result;
use crate::dev_paths::DevPaths;
use crate::progress::ProgressOptions;
use core::time::Duration;
use ohno::{EnrichableExt, IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "    config";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "nbkit.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Appearance of progress bars
    #[serde(default)]
    pub progress: ProgressOptions,

    /// Development checkout locations
    #[serde(default)]
    pub dev: DevPaths,

    /// Spreadsheet download settings
    #[serde(default)]
    pub sheets: SheetSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SheetSettings {
    /// Download timeout in seconds
    pub timeout: u64,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self { timeout: 30 }
    }
}

impl SheetSettings {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// Without an explicit path, `nbkit.toml` in `base_dir` is used when it exists.
    pub fn load(base_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{}'", path.display()))?;
            (path.to_path_buf(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "no configuration file at '{}', using defaults", path.display());
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{}'", path.display())),
            }
        };

        let config = Self::parse(&text).map_err(|e| e.enrich_with(|| format!("loading configuration file '{}'", final_path.display())))?;
        log::debug!(target: LOG_TARGET, "loaded configuration from '{}'", final_path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).into_app_err("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Path) -> Result<PathBuf> {
        fs::write(output_path, DEFAULT_CONFIG_TOML)
            .into_app_err_with(|| format!("writing default configuration to '{}'", output_path.display()))?;
        Ok(output_path.to_path_buf())
    }

    fn validate(&self) -> Result<()> {
        self.progress.validate()?;

        if self.sheets.timeout == 0 {
            return Err(app_err!("sheets.timeout must be at least 1 second"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path(), Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_from_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[progress]\nbar_width = 20\nfill_character = '='\n\n[dev]\nroot = '/src'\n",
        )
        .unwrap();

        let config = Config::load(dir.path(), None).unwrap();
        assert_eq!(config.progress.bar_width, 20);
        assert_eq!(config.progress.fill_character, '=');
        assert_eq!(config.dev.root.as_deref(), Some(Path::new("/src")));
        assert_eq!(config.sheets.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::parse("[progress]\nbar_width = 3\n").is_err());
        assert!(Config::parse("[sheets]\ntimeout = 0\n").is_err());
        assert!(Config::parse("[unknown]\nx = 1\n").is_err());
    }

    #[test]
    fn test_save_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::save_default(&dir.path().join("out.toml")).unwrap();
        let config = Config::load(dir.path(), Some(&path)).unwrap();
        assert_eq!(config, Config::default());
    }
}
