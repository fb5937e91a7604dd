//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `mernkit-adapters` crate provides implementations.

use std::path::Path;

use crate::application::error::ApplicationResult;
use crate::domain::{DomainError, ProjectConfig, ProjectRoot, ProvisioningPlan};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `mernkit_adapters::filesystem::LocalFilesystem` (production)
/// - `mernkit_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute; the plan validator guarantees they sit under the
///   project root
/// - `remove_dir_all` is forced: it must not fail only because the tree is
///   non-empty or holds read-only entries
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ApplicationResult<()>;

    /// Write content to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &str) -> ApplicationResult<()>;

    /// Read a file as UTF-8.
    fn read_file(&self, path: &Path) -> ApplicationResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> ApplicationResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ApplicationResult<()>;
}

/// Port for running external commands.
///
/// Implemented by:
/// - `mernkit_adapters::command::ShellCommandRunner` (production)
/// - `mernkit_adapters::command::ScriptedCommandRunner` (testing)
///
/// The command is opaque: only its exit status is observed. Standard I/O is
/// inherited so the user sees the tool's own output. Implementations block
/// until the process exits.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `working_dir`; non-zero exit or spawn failure is an
    /// `ApplicationError::ExternalCommand`.
    fn run(&self, working_dir: &Path, command: &str) -> ApplicationResult<()>;
}

/// Port for turning user choices into a provisioning plan.
///
/// Implemented by:
/// - `mernkit_adapters::planner::MernPlanner`
///
/// Planning is pure: no filesystem access, no commands.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectPlanner: Send + Sync {
    /// Build the ordered plan for `config` rooted at `root`.
    fn plan(&self, config: &ProjectConfig, root: ProjectRoot)
    -> Result<ProvisioningPlan, DomainError>;
}
