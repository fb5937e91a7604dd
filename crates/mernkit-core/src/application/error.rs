//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not business
//! logic. Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DeleteKind, SessionState};
use crate::error::ErrorCategory;

/// Errors that occur while executing provisioning steps or talking to ports.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A `CreateDirectory` step failed.
    #[error("Failed to create directory {path}: {reason}")]
    DirectoryCreation { path: PathBuf, reason: String },

    /// A `WriteFile` (or file-editing) step failed.
    #[error("Failed to write file {path}: {reason}")]
    FileWrite { path: PathBuf, reason: String },

    /// An external command could not be spawned or exited non-zero.
    #[error("Command `{command}` failed in {working_dir}: {reason}")]
    ExternalCommand {
        command: String,
        working_dir: PathBuf,
        reason: String,
    },

    /// Raw filesystem port failure (read, remove, lock).
    #[error("Filesystem error at {path}: {reason}")]
    Filesystem { path: PathBuf, reason: String },

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The session was driven through an illegal state change.
    #[error("Invalid session transition from {from} to {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
}

impl ApplicationError {
    /// The underlying cause without the path prefix, for callers that
    /// already name the path.
    pub fn into_reason(self) -> String {
        match self {
            Self::Filesystem { reason, .. }
            | Self::DirectoryCreation { reason, .. }
            | Self::FileWrite { reason, .. } => reason,
            other => other.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryCreation { path, .. } | Self::FileWrite { path, .. } => vec![
                format!("Failed to write under: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::ExternalCommand { command, .. } => vec![
                format!("External command failed: {}", command),
                "Ensure node and npm are installed and in your PATH".into(),
                "Check the command output above for details".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                format!("Or remove the existing directory: rm -rf {}", path.display()),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryCreation { .. }
            | Self::FileWrite { .. }
            | Self::ExternalCommand { .. } => ErrorCategory::Provisioning,
            Self::ProjectExists { .. } => ErrorCategory::Conflict,
            Self::Filesystem { .. } | Self::InvalidTransition { .. } => ErrorCategory::Internal,
        }
    }
}

/// The first step failure of a run, carrying the step that raised it.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Step {} ({step}) failed: {cause}", .step_index + 1)]
pub struct ProvisioningError {
    /// Zero-based position of the failing step in the plan.
    pub step_index: usize,
    /// Human-readable step description.
    pub step: String,
    #[source]
    pub cause: ApplicationError,
}

/// A compensating deletion that exhausted its retries.
///
/// Only ever surfaces inside a rollback report; never fatal.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Failed to delete {kind} {path} after {attempts} attempt(s): {reason}")]
pub struct DeleteError {
    pub path: PathBuf,
    pub kind: DeleteKind,
    pub attempts: u32,
    pub reason: String,
}

/// Result alias for port calls.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
