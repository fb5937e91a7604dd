//! Interactive prompts for `mernkit new`.
//!
//! Callers decide whether a prompt is appropriate (TTY, `--yes`); these
//! functions always ask. Without the `interactive` feature every prompt
//! reports [`CliError::FeatureNotAvailable`].

use crate::error::CliError;
#[cfg(not(feature = "interactive"))]
use crate::error::CliResult;

#[cfg(feature = "interactive")]
pub use dialog::{confirm, project_name, select};

#[cfg(feature = "interactive")]
mod dialog {
    use std::io;

    use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

    use mernkit_core::domain::validate_project_name;

    use crate::error::{CliError, CliResult};

    pub fn project_name() -> CliResult<String> {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Project name")
            .validate_with(|name: &String| {
                validate_project_name(name).map_err(|e| e.to_string())
            })
            .interact_text()
            .map(|name| name.trim().to_string())
            .map_err(prompt_error)
    }

    /// Pick one of `options`, preselecting `default`; `label` renders each
    /// choice.
    pub fn select<T: Copy + PartialEq>(
        prompt: &str,
        options: &[T],
        default: T,
        label: impl Fn(&T) -> String,
    ) -> CliResult<T> {
        let labels: Vec<String> = options.iter().map(label).collect();
        let preselected = options.iter().position(|o| *o == default).unwrap_or(0);

        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(labels.as_slice())
            .default(preselected)
            .interact()
            .map_err(prompt_error)?;

        options
            .get(index)
            .copied()
            .ok_or_else(|| CliError::InvalidInput {
                message: format!("no option at index {index}"),
                source: None,
            })
    }

    pub fn confirm(prompt: &str, default: bool) -> CliResult<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(prompt_error)
    }

    /// Ctrl-C at a prompt is a cancellation, anything else an I/O failure.
    pub(super) fn prompt_error(err: dialoguer::Error) -> CliError {
        match err {
            dialoguer::Error::IO(source) if source.kind() == io::ErrorKind::Interrupted => {
                CliError::Cancelled
            }
            dialoguer::Error::IO(source) => CliError::IoError {
                message: "Prompt failed".into(),
                source,
            },
            #[allow(unreachable_patterns)]
            other => CliError::InvalidInput {
                message: other.to_string(),
                source: None,
            },
        }
    }
}

#[cfg(not(feature = "interactive"))]
pub fn project_name() -> CliResult<String> {
    Err(unavailable())
}

#[cfg(not(feature = "interactive"))]
pub fn select<T: Copy + PartialEq>(
    _prompt: &str,
    _options: &[T],
    _default: T,
    _label: impl Fn(&T) -> String,
) -> CliResult<T> {
    Err(unavailable())
}

#[cfg(not(feature = "interactive"))]
pub fn confirm(_prompt: &str, _default: bool) -> CliResult<bool> {
    Err(unavailable())
}

#[cfg_attr(feature = "interactive", allow(dead_code))]
fn unavailable() -> CliError {
    CliError::FeatureNotAvailable {
        feature: "interactive",
    }
}

/// Whether this build can prompt at all.
pub const fn available() -> bool {
    cfg!(feature = "interactive")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_prompt_names_the_feature() {
        let err = unavailable();
        assert!(err.to_string().contains("interactive"));
        assert_eq!(err.exit_code(), 4);
    }

    #[cfg(feature = "interactive")]
    #[test]
    fn interrupted_prompt_is_a_cancellation() {
        use std::io;
        let err = dialog::prompt_error(dialoguer::Error::IO(io::Error::from(
            io::ErrorKind::Interrupted,
        )));
        assert!(matches!(err, CliError::Cancelled));
    }

    #[cfg(feature = "interactive")]
    #[test]
    fn other_prompt_failures_are_io_errors() {
        use std::io;
        let err = dialog::prompt_error(dialoguer::Error::IO(io::Error::other("not a terminal")));
        assert!(matches!(err, CliError::IoError { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
