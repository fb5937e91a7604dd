//! `mernkit config`: inspect configuration values.

use std::path::PathBuf;

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config_file: Option<&PathBuf>,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.json(&value)?;
            output.print(&format!("{key} = {}", render(&value)))?;
        }

        ConfigCommands::List => {
            output.json(&config)?;
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => match AppConfig::active_path(config_file) {
            Some(path) => {
                output.json(&path)?;
                output.print(&path.display().to_string())?;
            }
            None => {
                let global = AppConfig::config_path();
                output.json(&Value::Null)?;
                output.print(&global.display().to_string())?;
                output.info("No configuration file yet; run 'mernkit init' to create it")?;
            }
        },
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Walk a dotted key such as `rollback.max_attempts` through the
/// serialised config.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut current = &root;
    for segment in key.split('.') {
        current = current.get(segment).ok_or_else(unknown)?;
    }
    Ok(current.clone())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(unset)".into(),
        other => other.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "defaults.bundler").unwrap();
        assert_eq!(render(&value), "vite");
    }

    #[test]
    fn get_numeric_key() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "rollback.max_attempts").unwrap();
        assert_eq!(render(&value), "3");
    }

    #[test]
    fn get_section_renders_as_json() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "output").unwrap();
        assert!(render(&value).contains("\"no_color\":false"));
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
        assert!(get_config_value(&cfg, "defaults.bundler.deeper").is_err());
    }

    #[test]
    fn unset_log_file_renders_as_unset() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "logging.file").unwrap();
        assert_eq!(render(&value), "(unset)");
    }

    #[test]
    fn get_no_color_default() {
        let cfg = AppConfig::default();
        let value = get_config_value(&cfg, "output.no_color").unwrap();
        assert_eq!(render(&value), "false");
    }
}
