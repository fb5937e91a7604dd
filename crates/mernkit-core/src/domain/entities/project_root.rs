use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::domain::error::DomainError;

/// The absolute directory every provisioned path must live under.
///
/// Invariant: absolute and free of `..` components. Enforced at
/// construction, so `contains` can be a purely lexical check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(DomainError::RootNotAbsolute { path });
        }
        if has_parent_component(&path) {
            return Err(DomainError::PathOutsideRoot {
                root: path.clone(),
                path,
            });
        }
        Ok(Self(normalize(&path)))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Directory name of the root, used as the project name in templates.
    pub fn name(&self) -> Option<&str> {
        self.0.file_name().and_then(|n| n.to_str())
    }

    /// Resolve a relative path under the root.
    ///
    /// An empty path resolves to the root itself.
    pub fn join(&self, relative: impl AsRef<Path>) -> Result<PathBuf, DomainError> {
        let relative = relative.as_ref();
        if relative.is_absolute() || has_parent_component(relative) {
            return Err(DomainError::PathOutsideRoot {
                path: relative.to_path_buf(),
                root: self.0.clone(),
            });
        }
        Ok(normalize(&self.0.join(relative)))
    }

    /// Whether `path` equals the root or is a descendant of it.
    pub fn contains(&self, path: &Path) -> bool {
        path.is_absolute() && !has_parent_component(path) && normalize(path).starts_with(&self.0)
    }

    /// Path relative to the root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.0).unwrap_or(path)
    }
}

impl AsRef<Path> for ProjectRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

fn has_parent_component(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Drop `.` components so that `starts_with` comparisons are stable.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
