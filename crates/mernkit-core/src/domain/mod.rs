// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for mernkit.
//!
//! This module contains the data the provisioning engine works on: the
//! project configuration, the plan of steps, the rollback journal and the
//! rollback report. All I/O is handled via ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable steps**: a `Step` never changes once planned
//! - **Append-only journal**: entries are never removed
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    ExternalCommand, FailedArtifact, JournalEntry, ProjectConfig, ProjectConfigBuilder,
    ProjectRoot, ProvisioningPlan, RemovedArtifact, RollbackJournal, RollbackReport, Step,
    project_config::validate_project_name,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{Bundler, CssFramework, DeleteKind, Orm, SessionState};

pub use validation::DomainValidator;
