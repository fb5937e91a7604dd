//! Error handling for the mernkit CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - The rollback report when provisioning failed
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use mernkit_core::application::{ApplicationError, SessionFailure};
use mernkit_core::domain::{DomainError, RollbackReport};
use mernkit_core::error::{ErrorCategory as CoreCategory, MernkitError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Project name validation failed.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Target directory already exists; nothing was touched.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `mernkit-core` that did not involve a
    /// rollback.
    #[error("{0}")]
    Core(#[from] MernkitError),

    /// A step failed after execution started; everything the run created
    /// was rolled back (see the embedded report).
    #[error("{failure}")]
    ProvisioningFailed {
        #[source]
        failure: Box<SessionFailure>,
    },

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not available (e.g., interactive mode without feature flag).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidProjectName { name, reason } => {
                CliError::InvalidProjectName { name, reason }
            }
            other => CliError::Core(other.into()),
        }
    }
}

impl From<SessionFailure> for CliError {
    fn from(failure: SessionFailure) -> Self {
        if failure.rolled_back() {
            return CliError::ProvisioningFailed {
                failure: Box::new(failure),
            };
        }
        match failure.error {
            MernkitError::Application(ApplicationError::ProjectExists { path }) => {
                CliError::ProjectExists { path }
            }
            MernkitError::Domain(e) => e.into(),
            other => CliError::Core(other),
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-app, mern_shop, blog2".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already exists and was left untouched", path.display()),
                "Choose a different project name".into(),
                format!("Or remove the existing directory: rm -rf {}", path.display()),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Use 'mernkit init --force' to write a fresh default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::ProvisioningFailed { failure } => {
                let mut out = failure.error.suggestions();
                if failure.report.as_ref().is_some_and(|r| !r.is_clean()) {
                    out.push("Remove the leftover paths listed above by hand".into());
                }
                out
            }

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                format!("Install with the feature enabled: cargo install mernkit-cli --features {}", feature),
                "Or pass every choice as a flag together with --yes".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::InvalidProjectName { .. } => ErrorCategory::UserError,
            Self::ProjectExists { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Provisioning => ErrorCategory::Provisioning,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::ProvisioningFailed { .. } => ErrorCategory::Provisioning,
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Configuration |  4   |
    /// | Provisioning  |  1   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        if let Self::ProvisioningFailed { failure } = self {
            return failure.exit_code();
        }
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Provisioning | ErrorCategory::Internal => 1,
        }
    }

    /// The rollback report, when a rollback ran.
    pub fn rollback_report(&self) -> Option<&RollbackReport> {
        match self {
            Self::ProvisioningFailed { failure } => failure.report.as_ref(),
            _ => None,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        // Error header
        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        // Main error message
        output.push_str(&format!("  {}\n", self.to_string().red()));

        // Error chain (if verbose)
        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        if let Some(report) = self.rollback_report() {
            let (headline, lines) = rollback_lines(report);
            output.push('\n');
            if report.is_clean() {
                output.push_str(&format!("{}\n", headline.green().bold()));
            } else {
                output.push_str(&format!("{}\n", headline.red().bold()));
            }
            for line in lines {
                output.push_str(&format!("  {}\n", line));
            }
        }

        // Suggestions
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        // Hint to re-run with -v
        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        if let Some(report) = self.rollback_report() {
            let (headline, lines) = rollback_lines(report);
            out.push_str(&format!("\n{headline}\n"));
            for line in lines {
                out.push_str(&format!("  {line}\n"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Provisioning => tracing::error!("Provisioning failed: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Headline plus one line per artifact the rollback could not remove.
fn rollback_lines(report: &RollbackReport) -> (String, Vec<String>) {
    let removed = report.removed().len();
    if report.is_clean() {
        return (
            format!("Rolled back: removed {removed} artifact(s), nothing was left behind"),
            Vec::new(),
        );
    }

    let headline = format!(
        "Rollback incomplete: removed {removed} artifact(s), {} could not be removed:",
        report.failed().len()
    );
    let lines = report
        .failed()
        .iter()
        .map(|f| {
            format!(
                "\u{2022} {} {} ({} attempt(s): {})",
                f.kind,
                f.path.display(),
                f.attempts,
                f.reason
            )
        })
        .collect();
    (headline, lines)
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments, existing project).
    UserError,
    /// Configuration error.
    Configuration,
    /// A provisioning step failed and the run was rolled back.
    Provisioning,
    /// Internal/system error.
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    use mernkit_core::application::ProvisioningError;
    use mernkit_core::domain::DeleteKind;

    fn failure(report: Option<RollbackReport>) -> SessionFailure {
        SessionFailure {
            session_id: Default::default(),
            error: MernkitError::Provisioning(ProvisioningError {
                step_index: 3,
                step: "run `npm install` in /w/app/backend".into(),
                cause: ApplicationError::ExternalCommand {
                    command: "npm install".into(),
                    working_dir: "/w/app/backend".into(),
                    reason: "exited with status 1".into(),
                },
            }),
            report,
        }
    }

    fn clean_report() -> RollbackReport {
        let mut report = RollbackReport::start();
        report.record_removed(Path::new("/w/app/backend/package.json"), DeleteKind::File);
        report.record_removed(Path::new("/w/app/backend"), DeleteKind::Directory);
        report.record_removed(Path::new("/w/app"), DeleteKind::Directory);
        report.finish()
    }

    fn dirty_report() -> RollbackReport {
        let mut report = RollbackReport::start();
        report.record_removed(Path::new("/w/app/backend/index.js"), DeleteKind::File);
        report.record_failed(Path::new("/w/app/backend/.env"), DeleteKind::File, 3, "Resource busy");
        report.finish()
    }

    // ── conversions ───────────────────────────────────────────────────────

    #[test]
    fn rolled_back_failure_becomes_provisioning_failed() {
        let err = CliError::from(failure(Some(clean_report())));
        assert!(matches!(err, CliError::ProvisioningFailed { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn existing_root_becomes_user_error() {
        let err = CliError::from(SessionFailure {
            session_id: Default::default(),
            error: ApplicationError::ProjectExists {
                path: "/w/app".into(),
            }
            .into(),
            report: None,
        });
        assert!(matches!(err, CliError::ProjectExists { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn invalid_name_from_domain() {
        let err = CliError::from(DomainError::InvalidProjectName {
            name: ".hidden".into(),
            reason: "name cannot start with '.'".into(),
        });
        assert!(matches!(err, CliError::InvalidProjectName { .. }));
        assert!(!err.suggestions().is_empty());
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn clean_rollback_is_summarised() {
        let err = CliError::from(failure(Some(clean_report())));
        let s = err.format_plain(false);
        assert!(s.contains("Step 4"));
        assert!(s.contains("Rolled back: removed 3 artifact(s)"));
        assert!(!s.contains("by hand"));
    }

    #[test]
    fn incomplete_rollback_names_every_leftover() {
        let err = CliError::from(failure(Some(dirty_report())));
        let s = err.format_plain(false);
        assert!(s.contains("Rollback incomplete"));
        assert!(s.contains("/w/app/backend/.env (3 attempt(s): Resource busy)"));
        assert!(s.contains("by hand"));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
    }

    #[test]
    fn format_plain_verbose_shows_cause_chain() {
        let err = CliError::from(failure(Some(clean_report())));
        let s = err.format_plain(true);
        assert!(s.contains("Caused by:"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn format_colored_includes_rollback_headline() {
        let err = CliError::from(failure(Some(dirty_report())));
        assert!(err.format_colored(false).contains("Rollback incomplete"));
    }
}
