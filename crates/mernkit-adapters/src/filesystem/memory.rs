//! In-memory filesystem adapter for testing.
//!
//! Supports failure injection so rollback paths can be exercised without
//! touching the disk.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use mernkit_core::application::{ApplicationError, ApplicationResult, ports::Filesystem};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the
/// session owns a boxed copy.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Remaining forced failures per removal target.
    removal_failures: HashMap<PathBuf, u32>,
    write_failures: HashSet<PathBuf>,
    operations: Vec<String>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `times` removals of `path` fail.
    pub fn fail_removals(&self, path: impl Into<PathBuf>, times: u32) {
        self.write().removal_failures.insert(path.into(), times);
    }

    /// Make every write to `path` fail.
    pub fn fail_writes(&self, path: impl Into<PathBuf>) {
        self.write().write_failures.insert(path.into());
    }

    /// A file's content (testing helper).
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.read().files.get(path).cloned()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    /// List all directories (including implicit ancestors), sorted.
    pub fn list_directories(&self) -> Vec<PathBuf> {
        self.read().directories.iter().cloned().collect()
    }

    /// Every mutating call, in order, as `"<op> <path>"`.
    pub fn operations(&self) -> Vec<String> {
        self.read().operations.clone()
    }

    /// Clear all contents and injected failures.
    pub fn clear(&self) {
        *self.write() = MemoryFilesystemInner::default();
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryFilesystemInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryFilesystemInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryFilesystemInner {
    fn log(&mut self, op: &str, path: &Path) {
        self.operations.push(format!("{op} {}", path.display()));
    }

    fn take_removal_failure(&mut self, path: &Path) -> ApplicationResult<()> {
        match self.removal_failures.get_mut(path) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "Resource busy (injected)".into(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ApplicationResult<()> {
        let mut inner = self.write();
        inner.log("create_dir_all", path);

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        let mut inner = self.write();
        inner.log("write_file", path);

        if inner.write_failures.contains(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Write refused (injected)".into(),
            });
        }

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::Filesystem {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                });
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> ApplicationResult<String> {
        self.contents(path).ok_or_else(|| ApplicationError::Filesystem {
            path: path.to_path_buf(),
            reason: "No such file".into(),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn remove_file(&self, path: &Path) -> ApplicationResult<()> {
        let mut inner = self.write();
        inner.log("remove_file", path);
        inner.take_removal_failure(path)?;
        inner.files.remove(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ApplicationResult<()> {
        let mut inner = self.write();
        inner.log("remove_dir_all", path);
        inner.take_removal_failure(path)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.contents(Path::new("/a/b.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_all_drops_descendants() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/app/client/src")).unwrap();
        fs.write_file(Path::new("/app/client/src/main.jsx"), "").unwrap();

        fs.remove_dir_all(Path::new("/app/client")).unwrap();

        assert!(!fs.exists(Path::new("/app/client/src/main.jsx")));
        assert!(!fs.exists(Path::new("/app/client/src")));
        assert!(fs.exists(Path::new("/app")));
    }

    #[test]
    fn injected_removal_failures_run_out() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/app")).unwrap();
        fs.fail_removals("/app", 2);

        assert!(fs.remove_dir_all(Path::new("/app")).is_err());
        assert!(fs.remove_dir_all(Path::new("/app")).is_err());
        assert!(fs.remove_dir_all(Path::new("/app")).is_ok());
        assert!(!fs.exists(Path::new("/app")));
        assert_eq!(fs.operations().len(), 4);
    }

    #[test]
    fn injected_write_failure_keeps_file_absent() {
        let fs = MemoryFilesystem::new();
        fs.create_dir_all(Path::new("/app")).unwrap();
        fs.fail_writes("/app/.env");

        assert!(fs.write_file(Path::new("/app/.env"), "PORT=5000").is_err());
        assert!(!fs.exists(Path::new("/app/.env")));
        assert!(fs.write_file(Path::new("/app/index.js"), "").is_ok());
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new();
        let handle = fs.clone();
        fs.create_dir_all(Path::new("/shared")).unwrap();
        assert!(handle.exists(Path::new("/shared")));
    }
}
