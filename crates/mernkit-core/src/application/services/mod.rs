//! Application services - the transactional provisioning engine.
//!
//! Leaf-first: `retry` → `deleter` → `rollback`; `executor` runs the
//! forward pass; `session` ties both passes together.

pub mod deleter;
pub mod executor;
pub mod retry;
pub mod rollback;
pub mod session;

pub use deleter::RetryingDeleter;
pub use executor::StepExecutor;
pub use retry::{Exhausted, RetryPolicy};
pub use rollback::RollbackEngine;
pub use session::{CommitSummary, EXIT_FAILURE, ProvisioningSession, SessionFailure};
