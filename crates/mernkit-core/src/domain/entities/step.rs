use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// One declarative unit of provisioning work.
///
/// Steps are immutable once constructed. Paths are absolute; the planner
/// resolves them through [`ProjectRoot::join`](super::ProjectRoot::join)
/// and the plan validator checks they stay under the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Create a directory and any missing ancestors.
    CreateDirectory { path: PathBuf },

    /// Write (or overwrite) a file. The parent must already exist.
    WriteFile { path: PathBuf, content: String },

    /// Run an external command to completion.
    RunExternalCommand(ExternalCommand),

    /// Replace the `scripts` object of an existing `package.json`.
    UpdatePackageScripts {
        package_json: PathBuf,
        scripts: BTreeMap<String, String>,
    },

    /// Prepend a line to a file if it exists; no-op otherwise.
    PrependToFile { path: PathBuf, content: String },
}

impl Step {
    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    pub fn write_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::WriteFile {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn run(command: ExternalCommand) -> Self {
        Self::RunExternalCommand(command)
    }

    pub fn update_package_scripts<K, V>(
        package_json: impl Into<PathBuf>,
        scripts: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::UpdatePackageScripts {
            package_json: package_json.into(),
            scripts: scripts
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn prepend_to_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::PrependToFile {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Every path this step touches, for root containment checks.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            Self::CreateDirectory { path }
            | Self::WriteFile { path, .. }
            | Self::PrependToFile { path, .. } => vec![path.as_path()],
            Self::UpdatePackageScripts { package_json, .. } => vec![package_json.as_path()],
            Self::RunExternalCommand(cmd) => std::iter::once(cmd.working_dir.as_path())
                .chain(cmd.produces.iter().map(PathBuf::as_path))
                .collect(),
        }
    }

    /// Short human-readable description used in logs and errors.
    pub fn describe(&self) -> String {
        match self {
            Self::CreateDirectory { path } => format!("create directory {}", path.display()),
            Self::WriteFile { path, .. } => format!("write file {}", path.display()),
            Self::RunExternalCommand(cmd) => {
                format!("run `{}` in {}", cmd.command, cmd.working_dir.display())
            }
            Self::UpdatePackageScripts { package_json, .. } => {
                format!("update scripts in {}", package_json.display())
            }
            Self::PrependToFile { path, .. } => format!("prepend to {}", path.display()),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// An opaque shell command and what its success means for rollback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalCommand {
    pub working_dir: PathBuf,
    pub command: String,
    pub marks_dependencies_installed: bool,
    /// Files the command is known to generate, journaled on success.
    pub produces: Vec<PathBuf>,
}

impl ExternalCommand {
    pub fn new(working_dir: impl Into<PathBuf>, command: impl Into<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            command: command.into(),
            marks_dependencies_installed: false,
            produces: Vec::new(),
        }
    }

    /// Success of this command leaves a dependency tree behind.
    pub fn installs_dependencies(mut self) -> Self {
        self.marks_dependencies_installed = true;
        self
    }

    pub fn producing(mut self, path: impl Into<PathBuf>) -> Self {
        self.produces.push(path.into());
        self
    }
}
