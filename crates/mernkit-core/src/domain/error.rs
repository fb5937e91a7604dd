// ============================================================================
// domain/error.rs - DOMAIN VALIDATION ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside session failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Unknown {field} '{value}' (expected one of: {expected})")]
    UnknownOption {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Project root must be an absolute path: {path}")]
    RootNotAbsolute { path: PathBuf },

    #[error("Path {path} escapes project root {root}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Provisioning plan has no steps")]
    EmptyPlan,

    #[error("Plan must begin by creating the project root {root}")]
    RootNotCreatedFirst { root: PathBuf },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-app, mern_shop, blog2".into(),
            ],
            Self::UnknownOption {
                field, expected, ..
            } => vec![
                format!("Supported values for {}: {}", field, expected),
                format!("Example: mernkit new my-app --{} {}", field, first(expected)),
            ],
            Self::RootNotAbsolute { path } => vec![
                format!("Resolve '{}' against the working directory first", path.display()),
            ],
            Self::PathOutsideRoot { path, root } => vec![
                format!("Every generated path must live under {}", root.display()),
                format!("Offending path: {}", path.display()),
                "This is a bug in the planner, please report it".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::UnknownOption { .. } => {
                ErrorCategory::Validation
            }
            _ => ErrorCategory::Internal,
        }
    }
}

fn first(expected: &str) -> &str {
    expected.split(',').next().unwrap_or(expected).trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
