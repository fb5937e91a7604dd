//! Provisioning session - the orchestrator.
//!
//! Owns every piece of per-run state (journal, lifecycle state, ports) and
//! drives one plan through `Planning → Executing → Committed`, or
//! `Executing → RollingBack → Failed` when a step fails.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem},
        services::{RetryPolicy, RetryingDeleter, RollbackEngine, StepExecutor, rollback},
    },
    domain::{DomainValidator, ProvisioningPlan, RollbackJournal, RollbackReport, SessionState},
    error::MernkitError,
};

/// Process exit status after a rolled-back run.
pub const EXIT_FAILURE: u8 = 1;

/// What a committed run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub session_id: Uuid,
    pub root: PathBuf,
    pub steps_executed: usize,
    pub next_steps: Vec<String>,
}

/// Terminal failure of a session.
///
/// `report` is present whenever execution had started and a rollback ran.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct SessionFailure {
    pub session_id: Uuid,
    #[source]
    pub error: MernkitError,
    pub report: Option<RollbackReport>,
}

impl SessionFailure {
    pub fn exit_code(&self) -> u8 {
        EXIT_FAILURE
    }

    pub fn rolled_back(&self) -> bool {
        self.report.is_some()
    }
}

/// One all-or-nothing provisioning run.
pub struct ProvisioningSession {
    id: Uuid,
    state: SessionState,
    journal: RollbackJournal,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    retry: RetryPolicy,
    settle_delay: Duration,
}

impl ProvisioningSession {
    pub fn new(filesystem: Box<dyn Filesystem>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::default(),
            journal: RollbackJournal::new(),
            filesystem,
            runner,
            retry: RetryPolicy::default(),
            settle_delay: rollback::DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn journal(&self) -> &RollbackJournal {
        &self.journal
    }

    /// Execute `plan`; on the first failing step, roll back everything the
    /// run created.
    ///
    /// A session runs at most once. The plan is validated and the root is
    /// checked for existence before anything is touched: a pre-existing
    /// root fails without rollback.
    #[instrument(skip_all, fields(session_id = %self.id, root = %plan.root()))]
    pub fn run(&mut self, plan: &ProvisioningPlan) -> Result<CommitSummary, SessionFailure> {
        if self.state != SessionState::Planning {
            return Err(self.failure(
                ApplicationError::InvalidTransition {
                    from: self.state,
                    to: SessionState::Executing,
                }
                .into(),
                None,
            ));
        }

        if let Err(e) = DomainValidator::validate_plan(plan) {
            return Err(self.abort(e.into()));
        }
        if self.filesystem.exists(plan.root().path()) {
            return Err(self.abort(
                ApplicationError::ProjectExists {
                    path: plan.root().path().to_path_buf(),
                }
                .into(),
            ));
        }

        self.advance(SessionState::Executing)?;
        info!(steps = plan.len(), "Provisioning");

        let executor = StepExecutor::new(self.filesystem.as_ref(), self.runner.as_ref());
        match executor.execute(plan, &mut self.journal) {
            Ok(steps_executed) => {
                self.advance(SessionState::Committed)?;
                info!(steps_executed, "Committed");
                Ok(CommitSummary {
                    session_id: self.id,
                    root: plan.root().path().to_path_buf(),
                    steps_executed,
                    next_steps: plan.next_steps().to_vec(),
                })
            }
            Err(cause) => {
                error!(error = %cause, "Step failed");
                self.advance(SessionState::RollingBack)?;
                let report = self.rollback(plan);
                self.advance(SessionState::Failed)?;
                Err(self.failure(cause.into(), Some(report)))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn rollback(&self, plan: &ProvisioningPlan) -> RollbackReport {
        let deleter = RetryingDeleter::new(self.filesystem.as_ref(), self.retry);
        RollbackEngine::new(deleter)
            .with_settle_delay(self.settle_delay)
            .with_dependency_trees(plan.dependency_trees().iter().cloned())
            .rollback(&self.journal, plan.root())
    }

    fn advance(&mut self, next: SessionState) -> Result<(), SessionFailure> {
        if !self.state.can_transition_to(next) {
            let err = ApplicationError::InvalidTransition {
                from: self.state,
                to: next,
            };
            return Err(self.failure(err.into(), None));
        }
        debug!(from = %self.state, to = %next, "Session transition");
        self.state = next;
        Ok(())
    }

    /// Fail before execution started: nothing to roll back.
    fn abort(&mut self, error: MernkitError) -> SessionFailure {
        if self.state.can_transition_to(SessionState::Failed) {
            self.state = SessionState::Failed;
        }
        self.failure(error, None)
    }

    fn failure(&self, error: MernkitError, report: Option<RollbackReport>) -> SessionFailure {
        SessionFailure {
            session_id: self.id,
            error,
            report,
        }
    }
}
