//! Retrying deleter - the only way rollback touches the filesystem.

use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::{
    application::{ApplicationResult, DeleteError, ports::Filesystem, services::RetryPolicy},
    domain::DeleteKind,
};

/// Removes a file or directory tree, retrying transient failures.
///
/// An absent target counts as success, both up front and between
/// attempts. Directory deletion is recursive and forced.
pub struct RetryingDeleter<'a> {
    filesystem: &'a dyn Filesystem,
    policy: RetryPolicy,
}

impl<'a> RetryingDeleter<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, policy: RetryPolicy) -> Self {
        Self { filesystem, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn is_absent(&self, path: &Path) -> bool {
        !self.filesystem.exists(path)
    }

    /// Delete `path`, making at most `policy.max_attempts()` attempts.
    ///
    /// Returns the number of attempts made (`0` when nothing was there).
    #[instrument(skip(self), fields(path = %path.display(), kind = %kind))]
    pub fn delete_with_retry(&self, path: &Path, kind: DeleteKind) -> Result<u32, DeleteError> {
        let outcome = self.policy.run(
            || !self.filesystem.exists(path),
            |attempt| {
                let result = self.remove(path, kind);
                if let Err(e) = &result {
                    warn!(attempt, error = %e, "Delete attempt failed");
                }
                result
            },
        );

        match outcome {
            Ok(0) => {
                debug!("Already absent");
                Ok(0)
            }
            Ok(attempts) => {
                debug!(attempts, "Deleted");
                Ok(attempts)
            }
            Err(exhausted) => Err(DeleteError {
                path: path.to_path_buf(),
                kind,
                attempts: exhausted.attempts,
                reason: exhausted.last_error.into_reason(),
            }),
        }
    }

    fn remove(&self, path: &Path, kind: DeleteKind) -> ApplicationResult<()> {
        match kind {
            DeleteKind::File => self.filesystem.remove_file(path),
            DeleteKind::Directory => self.filesystem.remove_dir_all(path),
        }
    }
}
