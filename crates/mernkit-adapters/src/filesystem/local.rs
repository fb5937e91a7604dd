//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use mernkit_core::application::{ApplicationError, ApplicationResult, ports::Filesystem};
use tracing::debug;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
///
/// Removals are forced: when a removal is refused for permissions, every
/// entry under the target is made owner-writable and the removal is tried
/// once more. A target that is already gone counts as removed.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ApplicationResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> ApplicationResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        // Dangling symlinks still need removing.
        fs::symlink_metadata(path).is_ok()
    }

    fn remove_file(&self, path: &Path) -> ApplicationResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %path.display(), "Clearing read-only flag before removal");
                make_writable(path);
                fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
            }
            Err(e) => Err(map_io_error(path, e, "remove file")),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> ApplicationResult<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                debug!(path = %path.display(), "Clearing read-only entries before removal");
                for entry in WalkDir::new(path).into_iter().filter_map(Result::ok) {
                    make_writable(entry.path());
                }
                fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
            }
            Err(e) => Err(map_io_error(path, e, "remove directory")),
        }
    }
}

/// Best effort: failures surface on the following removal attempt.
fn make_writable(path: &Path) {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return;
    };
    if metadata.file_type().is_symlink() {
        return;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = metadata.permissions();
        perms.set_mode(perms.mode() | 0o700);
        let _ = fs::set_permissions(path, perms);
    }
    #[cfg(windows)]
    {
        let mut perms = metadata.permissions();
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        let _ = fs::set_permissions(path, perms);
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ApplicationError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
}
