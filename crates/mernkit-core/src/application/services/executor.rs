//! Step executor - the forward pass.
//!
//! Runs a plan strictly in order and journals every committed effect
//! before moving on, so a later failure always sees earlier work as
//! reversible.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError, ApplicationResult, ProvisioningError,
        ports::{CommandRunner, Filesystem},
    },
    domain::{ExternalCommand, JournalEntry, ProvisioningPlan, RollbackJournal, Step},
};

/// Executes provisioning steps through the filesystem and command ports.
///
/// Never retries: a failed step is reported once, with its position.
pub struct StepExecutor<'a> {
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
}

impl<'a> StepExecutor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, runner: &'a dyn CommandRunner) -> Self {
        Self { filesystem, runner }
    }

    /// Run every step of `plan`, stopping at the first failure.
    ///
    /// Returns the number of steps executed.
    #[instrument(skip_all, fields(root = %plan.root(), steps = plan.len()))]
    pub fn execute(
        &self,
        plan: &ProvisioningPlan,
        journal: &mut RollbackJournal,
    ) -> Result<usize, ProvisioningError> {
        for (step_index, step) in plan.steps().iter().enumerate() {
            debug!(step = step_index + 1, "{}", step);
            self.execute_step(step, journal)
                .map_err(|cause| ProvisioningError {
                    step_index,
                    step: step.describe(),
                    cause,
                })?;
        }

        info!(executed = plan.len(), "All steps executed");
        Ok(plan.len())
    }

    /// Run a single step and journal its effect.
    pub fn execute_step(&self, step: &Step, journal: &mut RollbackJournal) -> ApplicationResult<()> {
        match step {
            Step::CreateDirectory { path } => {
                self.filesystem
                    .create_dir_all(path)
                    .map_err(|e| ApplicationError::DirectoryCreation {
                        path: path.clone(),
                        reason: e.into_reason(),
                    })?;
                journal.record(JournalEntry::DirectoryCreated(path.clone()));
            }

            Step::WriteFile { path, content } => {
                self.write(path, content)?;
                journal.record(JournalEntry::FileCreated(path.clone()));
            }

            Step::RunExternalCommand(command) => self.run_command(command, journal)?,

            Step::UpdatePackageScripts {
                package_json,
                scripts,
            } => {
                self.update_scripts(package_json, scripts)?;
                journal.record(JournalEntry::FileCreated(package_json.clone()));
            }

            Step::PrependToFile { path, content } => {
                if !self.filesystem.exists(path) {
                    debug!(path = %path.display(), "Nothing to prepend to");
                    return Ok(());
                }
                let original = self.read(path)?;
                self.write(path, &format!("{content}\n{original}"))?;
                journal.record(JournalEntry::FileCreated(path.clone()));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn run_command(
        &self,
        command: &ExternalCommand,
        journal: &mut RollbackJournal,
    ) -> ApplicationResult<()> {
        info!(
            command = %command.command,
            cwd = %command.working_dir.display(),
            "Running command"
        );

        if let Err(e) = self.runner.run(&command.working_dir, &command.command) {
            if command.marks_dependencies_installed {
                // An aborted install can still leave a partial tree behind.
                journal.record(JournalEntry::DependenciesInstalled(true));
            }
            warn!(command = %command.command, error = %e, "Command failed");
            return Err(e);
        }

        for produced in &command.produces {
            journal.record(JournalEntry::FileCreated(produced.clone()));
        }
        if command.marks_dependencies_installed {
            journal.record(JournalEntry::DependenciesInstalled(true));
        }
        Ok(())
    }

    fn update_scripts(
        &self,
        package_json: &Path,
        scripts: &BTreeMap<String, String>,
    ) -> ApplicationResult<()> {
        let raw = self.read(package_json)?;
        let invalid = |reason: String| ApplicationError::FileWrite {
            path: package_json.to_path_buf(),
            reason,
        };

        let mut manifest: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| invalid(format!("invalid JSON: {e}")))?;
        let object = manifest
            .as_object_mut()
            .ok_or_else(|| invalid("package.json is not a JSON object".into()))?;

        let scripts = scripts
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        object.insert("scripts".into(), serde_json::Value::Object(scripts));

        let rendered = serde_json::to_string_pretty(&manifest)
            .map_err(|e| invalid(format!("could not serialise: {e}")))?;
        self.write(package_json, &rendered)
    }

    fn read(&self, path: &Path) -> ApplicationResult<String> {
        self.filesystem
            .read_file(path)
            .map_err(|e| ApplicationError::FileWrite {
                path: path.to_path_buf(),
                reason: e.into_reason(),
            })
    }

    fn write(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.filesystem
            .write_file(path, content)
            .map_err(|e| ApplicationError::FileWrite {
                path: path.to_path_buf(),
                reason: e.into_reason(),
            })
    }
}
