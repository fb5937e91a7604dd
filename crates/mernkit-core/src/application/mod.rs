//! Application layer for mernkit.
//!
//! This layer contains:
//! - **Services**: the provisioning engine (executor, deleter, rollback, session)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer. Plan invariants live
//! in `crate::domain`; side effects happen only through ports.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CommitSummary, ProvisioningSession, RetryPolicy, RetryingDeleter, RollbackEngine,
    SessionFailure, StepExecutor,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, Filesystem, ProjectPlanner};

pub use error::{ApplicationError, ApplicationResult, DeleteError, ProvisioningError};
