use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::{
    entities::{ProjectRoot, Step},
    error::DomainError,
};

/// Ordered steps for one project, plus what rollback needs to know about
/// work the journal cannot see.
///
/// Built by a planner (no side effects), consumed by the step executor.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningPlan {
    root: ProjectRoot,
    steps: Vec<Step>,
    /// Bulk trees left by dependency installs (e.g. `node_modules`).
    dependency_trees: Vec<PathBuf>,
    /// Follow-up instructions shown after a successful commit.
    next_steps: Vec<String>,
}

impl ProvisioningPlan {
    pub fn new(root: ProjectRoot) -> Self {
        Self {
            root,
            steps: Vec::new(),
            dependency_trees: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.push(step);
        self
    }

    pub fn add_dependency_tree(&mut self, path: impl Into<PathBuf>) {
        self.dependency_trees.push(path.into());
    }

    pub fn with_dependency_tree(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_dependency_tree(path);
        self
    }

    pub fn add_next_step(&mut self, line: impl Into<String>) {
        self.next_steps.push(line.into());
    }

    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn dependency_trees(&self) -> &[PathBuf] {
        &self.dependency_trees
    }

    pub fn next_steps(&self) -> &[String] {
        &self.next_steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check the invariants rollback relies on.
    ///
    /// - the plan is non-empty
    /// - the first step creates the root itself, so the root is journaled
    ///   and removed last
    /// - every path (steps and dependency trees) is under the root
    pub fn validate(&self) -> Result<(), DomainError> {
        let first = self.steps.first().ok_or(DomainError::EmptyPlan)?;
        match first {
            Step::CreateDirectory { path } if path.as_path() == self.root.path() => {}
            _ => {
                return Err(DomainError::RootNotCreatedFirst {
                    root: self.root.path().to_path_buf(),
                });
            }
        }

        let step_paths = self.steps.iter().flat_map(Step::paths);
        let tree_paths = self.dependency_trees.iter().map(PathBuf::as_path);
        for path in step_paths.chain(tree_paths) {
            self.ensure_contained(path)?;
        }
        Ok(())
    }

    fn ensure_contained(&self, path: &Path) -> Result<(), DomainError> {
        if self.root.contains(path) {
            Ok(())
        } else {
            Err(DomainError::PathOutsideRoot {
                path: path.to_path_buf(),
                root: self.root.path().to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ExternalCommand;

    fn root() -> ProjectRoot {
        ProjectRoot::new(std::env::temp_dir().join("plan-root")).unwrap()
    }

    #[test]
    fn empty_plan_is_invalid() {
        assert_eq!(
            ProvisioningPlan::new(root()).validate(),
            Err(DomainError::EmptyPlan)
        );
    }

    #[test]
    fn plan_must_start_with_root() {
        let root = root();
        let plan = ProvisioningPlan::new(root.clone())
            .with_step(Step::create_directory(root.join("client").unwrap()));
        assert!(matches!(
            plan.validate(),
            Err(DomainError::RootNotCreatedFirst { .. })
        ));
    }

    #[test]
    fn rejects_command_output_outside_root() {
        let root = root();
        let plan = ProvisioningPlan::new(root.clone())
            .with_step(Step::create_directory(root.path()))
            .with_step(Step::run(
                ExternalCommand::new(root.path(), "npm init -y")
                    .producing(std::env::temp_dir().join("stray.json")),
            ));
        assert!(matches!(
            plan.validate(),
            Err(DomainError::PathOutsideRoot { .. })
        ));
    }

    #[test]
    fn rejects_dependency_tree_outside_root() {
        let root = root();
        let plan = ProvisioningPlan::new(root.clone())
            .with_step(Step::create_directory(root.path()))
            .with_dependency_tree(std::env::temp_dir().join("node_modules"));
        assert!(plan.validate().is_err());
    }

    #[test]
    fn well_formed_plan_validates() {
        let root = root();
        let plan = ProvisioningPlan::new(root.clone())
            .with_step(Step::create_directory(root.path()))
            .with_step(Step::create_directory(root.join("backend").unwrap()))
            .with_step(Step::write_file(
                root.join("backend/package.json").unwrap(),
                "{}",
            ))
            .with_dependency_tree(root.join("backend/node_modules").unwrap());
        assert!(plan.validate().is_ok());
        assert_eq!(plan.len(), 3);
    }
}
