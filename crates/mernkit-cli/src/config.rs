//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the values derived from
//! it (project defaults, retry policy, settle delay).
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`MERNKIT_ROLLBACK__MAX_ATTEMPTS=5`)
//! 3. `--config FILE`
//! 4. `mernkit.toml` in the current directory
//! 5. Global config file (see [`AppConfig::config_path`])
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use mernkit_core::application::RetryPolicy;
use mernkit_core::domain::{Bundler, CssFramework, Orm};

/// File name of the per-directory config written by `mernkit init --local`.
pub const LOCAL_CONFIG_FILE: &str = "mernkit.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default choices for new projects.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Rollback tuning.
    pub rollback: RollbackConfig,
    /// Log file settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub bundler: Bundler,
    pub css: CssFramework,
    pub orm: Orm,
    pub testing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`; `--output-format` wins.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollbackConfig {
    /// Deletion attempts per artifact.
    pub max_attempts: u32,
    /// Linear backoff unit between attempts.
    pub backoff_ms: u64,
    /// Pause before the first deletion so child processes release handles.
    pub settle_ms: u64,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            max_attempts: RetryPolicy::DEFAULT_MAX_ATTEMPTS,
            backoff_ms: millis(RetryPolicy::DEFAULT_BACKOFF),
            settle_ms: millis(mernkit_core::application::services::rollback::DEFAULT_SETTLE_DELAY),
        }
    }
}

impl RollbackConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.backoff_ms))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write JSON logs here; `--log-file` wins.
    pub file: Option<PathBuf>,
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl AppConfig {
    /// Load configuration from every source in priority order.
    ///
    /// `config_file` is the path the user passed via `--config`; unlike the
    /// implicit locations it must exist.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::load_from(Some(&Self::config_path()), &cwd, config_file.map(PathBuf::as_path))
    }

    /// Same as [`Self::load`] with the global path and working directory
    /// supplied by the caller.
    pub fn load_from(
        global: Option<&Path>,
        cwd: &Path,
        explicit: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        if let Some(global) = global {
            builder = builder.add_source(File::from(global).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(
            File::from(cwd.join(LOCAL_CONFIG_FILE))
                .format(FileFormat::Toml)
                .required(false),
        );
        if let Some(explicit) = explicit {
            builder = builder.add_source(File::from(explicit).format(FileFormat::Toml).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("MERNKIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the global configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `mernkit.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "mernkit", "mernkit")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file that would win among the file sources, if any exists.
    pub fn active_path(explicit: Option<&PathBuf>) -> Option<PathBuf> {
        if let Some(explicit) = explicit {
            return Some(explicit.clone());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Some(local);
        }
        let global = Self::config_path();
        global.is_file().then_some(global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_engine_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.bundler, Bundler::Vite);
        assert_eq!(cfg.defaults.orm, Orm::None);
        assert!(!cfg.defaults.testing);
        assert_eq!(cfg.rollback.retry_policy(), RetryPolicy::default());
        assert_eq!(cfg.rollback.settle_delay(), Duration::from_millis(500));
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg =
            AppConfig::load_from(Some(&tmp.path().join("absent.toml")), tmp.path(), None).unwrap();
        assert_eq!(cfg.defaults, AppConfig::default().defaults);
    }

    #[test]
    fn local_file_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        std::fs::write(&global, "[defaults]\nbundler = \"webpack\"\norm = \"sequelize\"\n").unwrap();
        std::fs::write(
            tmp.path().join(LOCAL_CONFIG_FILE),
            "[defaults]\norm = \"mongoose\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(Some(&global), tmp.path(), None).unwrap();
        assert_eq!(cfg.defaults.bundler, Bundler::Webpack);
        assert_eq!(cfg.defaults.orm, Orm::Mongoose);
        assert_eq!(cfg.defaults.css, CssFramework::None);
    }

    #[test]
    fn explicit_file_must_exist() {
        let tmp = TempDir::new().unwrap();
        let result = AppConfig::load_from(None, tmp.path(), Some(&tmp.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn rollback_section_builds_policy() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("c.toml");
        std::fs::write(&file, "[rollback]\nmax_attempts = 0\nsettle_ms = 0\n").unwrap();

        let cfg = AppConfig::load_from(None, tmp.path(), Some(&file)).unwrap();
        assert_eq!(cfg.rollback.retry_policy().max_attempts(), 1);
        assert_eq!(cfg.rollback.backoff_ms, 500);
        assert_eq!(cfg.rollback.settle_delay(), Duration::ZERO);
    }

    #[test]
    fn unknown_option_value_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("c.toml");
        std::fs::write(&file, "[defaults]\nbundler = \"parcel\"\n").unwrap();
        assert!(AppConfig::load_from(None, tmp.path(), Some(&file)).is_err());
    }

    #[test]
    fn serialised_defaults_load_back() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("c.toml");
        std::fs::write(&file, toml::to_string_pretty(&AppConfig::default()).unwrap()).unwrap();
        let cfg = AppConfig::load_from(None, tmp.path(), Some(&file)).unwrap();
        assert_eq!(cfg.rollback, RollbackConfig::default());
        assert_eq!(cfg.output, OutputConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
