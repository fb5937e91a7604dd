pub mod journal;
pub mod plan;
pub mod project_config;
pub mod project_root;
pub mod report;
pub mod step;

pub use crate::domain::DomainError;
pub use journal::{JournalEntry, RollbackJournal};
pub use plan::ProvisioningPlan;
pub use project_config::{ProjectConfig, ProjectConfigBuilder};
pub use project_root::ProjectRoot;
pub use report::{FailedArtifact, RemovedArtifact, RollbackReport};
pub use step::{ExternalCommand, Step};
