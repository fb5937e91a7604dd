//! Unified error handling for mernkit core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, ProvisioningError};
use crate::domain::DomainError;

/// Root error type for mernkit core operations.
///
/// This enum wraps all possible errors that can occur when using mernkit-core,
/// providing a unified interface for error handling.
#[derive(Debug, Error, Clone)]
pub enum MernkitError {
    /// Errors from the domain layer (validation failures).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A provisioning step failed and the run was rolled back.
    #[error("Provisioning failed: {0}")]
    Provisioning(#[from] ProvisioningError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl MernkitError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Provisioning(e) => {
                let mut out = vec![format!("Failing step: {}", e.step)];
                out.extend(e.cause.suggestions());
                out
            }
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in mernkit".into(),
                "Please report this issue at: https://github.com/cosecruz/mernkit/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Provisioning(_) => ErrorCategory::Provisioning,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Provisioning,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type MernkitResult<T> = Result<T, MernkitError>;
