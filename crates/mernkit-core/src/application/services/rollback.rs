//! Rollback engine - the compensating pass.
//!
//! Walks the journal newest-first, so every file is attempted before the
//! directory it was written into, then sweeps known dependency trees.
//! Never fails: each unreversed artifact ends up named in the report.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::{
    application::services::RetryingDeleter,
    domain::{DeleteKind, JournalEntry, ProjectRoot, RollbackJournal, RollbackReport},
};

/// Wait before the first deletion so a just-failed child releases handles.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

pub struct RollbackEngine<'a> {
    deleter: RetryingDeleter<'a>,
    settle_delay: Duration,
    dependency_trees: Vec<PathBuf>,
}

impl<'a> RollbackEngine<'a> {
    pub fn new(deleter: RetryingDeleter<'a>) -> Self {
        Self {
            deleter,
            settle_delay: DEFAULT_SETTLE_DELAY,
            dependency_trees: Vec::new(),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Trees produced by opaque install commands (e.g. `node_modules`).
    pub fn with_dependency_trees(mut self, trees: impl IntoIterator<Item = PathBuf>) -> Self {
        self.dependency_trees = trees.into_iter().collect();
        self
    }

    #[instrument(skip_all, fields(root = %root, entries = journal.len()))]
    pub fn rollback(&self, journal: &RollbackJournal, root: &ProjectRoot) -> RollbackReport {
        let mut report = RollbackReport::start();
        info!("Rolling back");

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        for entry in journal.iter_rev() {
            match entry {
                JournalEntry::FileCreated(path) => {
                    self.remove(path, DeleteKind::File, root, &mut report)
                }
                JournalEntry::DirectoryCreated(path) => {
                    self.remove(path, DeleteKind::Directory, root, &mut report)
                }
                JournalEntry::DependenciesInstalled(_) => {}
            }
        }

        if journal.dependencies_installed() {
            for tree in &self.dependency_trees {
                self.remove(tree, DeleteKind::Directory, root, &mut report);
            }
        }

        report.reconcile(|path| root.contains(path) && self.deleter.is_absent(path));

        let report = report.finish();
        if report.is_clean() {
            info!(removed = report.removed().len(), "Rollback complete");
        } else {
            warn!(
                removed = report.removed().len(),
                failed = report.failed().len(),
                "Rollback incomplete"
            );
        }
        report
    }

    fn remove(&self, path: &Path, kind: DeleteKind, root: &ProjectRoot, report: &mut RollbackReport) {
        if !root.contains(path) {
            warn!(path = %path.display(), "Refusing to delete outside project root");
            report.record_failed(path, kind, 0, "outside project root");
            return;
        }

        match self.deleter.delete_with_retry(path, kind) {
            Ok(_) => report.record_removed(path, kind),
            Err(e) => {
                warn!(error = %e, "Could not reverse artifact");
                report.record_failed(path, kind, e.attempts, e.reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::application::{
        ApplicationError, ports::output::MockFilesystem, services::RetryPolicy,
    };

    fn root() -> ProjectRoot {
        ProjectRoot::new("/work/app").unwrap()
    }

    fn journal(entries: impl IntoIterator<Item = JournalEntry>) -> RollbackJournal {
        let mut journal = RollbackJournal::new();
        for entry in entries {
            journal.record(entry);
        }
        journal
    }

    /// Filesystem mock that records removals and reports everything present
    /// until removed.
    fn recording_fs(log: Arc<Mutex<Vec<String>>>) -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        let seen = Arc::clone(&log);
        fs.expect_exists().returning(move |p| {
            let removed = seen.lock().unwrap();
            !removed.iter().any(|r| p.starts_with(r.split_once(' ').unwrap().1))
        });
        let files = Arc::clone(&log);
        fs.expect_remove_file().returning(move |p| {
            files.lock().unwrap().push(format!("file {}", p.display()));
            Ok(())
        });
        let dirs = Arc::clone(&log);
        fs.expect_remove_dir_all().returning(move |p| {
            dirs.lock().unwrap().push(format!("dir {}", p.display()));
            Ok(())
        });
        fs
    }

    #[test]
    fn removes_newest_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let fs = recording_fs(Arc::clone(&log));
        let engine = RollbackEngine::new(RetryingDeleter::new(&fs, RetryPolicy::immediate(3)))
            .with_settle_delay(Duration::ZERO);

        let journal = journal([
            JournalEntry::DirectoryCreated("/work/app".into()),
            JournalEntry::DirectoryCreated("/work/app/backend".into()),
            JournalEntry::FileCreated("/work/app/backend/index.js".into()),
        ]);
        let report = engine.rollback(&journal, &root());

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "file /work/app/backend/index.js",
                "dir /work/app/backend",
                "dir /work/app",
            ]
        );
        assert_eq!(report.removed().len(), 3);
        assert!(report.is_clean());
        assert!(report.finished_at().is_some());
    }

    #[test]
    fn failure_is_reported_and_rollback_continues() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_remove_file().times(2).returning(|p| {
            Err(ApplicationError::Filesystem {
                path: p.to_path_buf(),
                reason: "locked".into(),
            })
        });
        fs.expect_remove_dir_all().times(1).returning(|_| Ok(()));

        let engine = RollbackEngine::new(RetryingDeleter::new(&fs, RetryPolicy::immediate(2)))
            .with_settle_delay(Duration::ZERO);
        let journal = journal([
            JournalEntry::DirectoryCreated("/work/app".into()),
            JournalEntry::FileCreated("/work/app/.env".into()),
        ]);
        let report = engine.rollback(&journal, &root());

        assert_eq!(report.failed().len(), 1);
        assert_eq!(report.failed()[0].path, PathBuf::from("/work/app/.env"));
        assert_eq!(report.failed()[0].attempts, 2);
        assert_eq!(report.removed()[0].path, PathBuf::from("/work/app"));
        assert!(!report.is_clean());
    }

    #[test]
    fn dependency_trees_only_swept_when_flagged() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_remove_dir_all().never();

        let engine = RollbackEngine::new(RetryingDeleter::new(&fs, RetryPolicy::immediate(3)))
            .with_settle_delay(Duration::ZERO)
            .with_dependency_trees([PathBuf::from("/work/app/client/node_modules")]);

        let unflagged = journal([JournalEntry::DirectoryCreated("/work/app".into())]);
        assert_eq!(engine.rollback(&unflagged, &root()).removed().len(), 1);

        let flagged = journal([
            JournalEntry::DirectoryCreated("/work/app".into()),
            JournalEntry::DependenciesInstalled(true),
        ]);
        let report = engine.rollback(&flagged, &root());
        assert_eq!(report.removed().len(), 2);
        assert_eq!(
            report.removed()[1].path,
            PathBuf::from("/work/app/client/node_modules")
        );
    }

    #[test]
    fn stuck_file_taken_by_parent_delete_is_reported_removed() {
        let gone = Arc::new(Mutex::new(false));
        let mut fs = MockFilesystem::new();
        let state = Arc::clone(&gone);
        fs.expect_exists().returning(move |_| !*state.lock().unwrap());
        fs.expect_remove_file().times(3).returning(|p| {
            Err(ApplicationError::Filesystem {
                path: p.to_path_buf(),
                reason: "Resource busy".into(),
            })
        });
        let state = Arc::clone(&gone);
        fs.expect_remove_dir_all().times(1).returning(move |_| {
            *state.lock().unwrap() = true;
            Ok(())
        });

        let engine = RollbackEngine::new(RetryingDeleter::new(&fs, RetryPolicy::immediate(3)))
            .with_settle_delay(Duration::ZERO);
        let journal = journal([
            JournalEntry::DirectoryCreated("/work/app".into()),
            JournalEntry::FileCreated("/work/app/.env".into()),
        ]);
        let report = engine.rollback(&journal, &root());

        assert!(report.is_clean());
        assert_eq!(report.removed().len(), 2);
        assert!(
            report
                .removed()
                .iter()
                .any(|r| r.path == PathBuf::from("/work/app/.env"))
        );
    }

    #[test]
    fn paths_outside_root_are_never_touched() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().never();
        fs.expect_remove_file().never();

        let engine = RollbackEngine::new(RetryingDeleter::new(&fs, RetryPolicy::immediate(3)))
            .with_settle_delay(Duration::ZERO);
        let journal = journal([JournalEntry::FileCreated("/etc/passwd".into())]);
        let report = engine.rollback(&journal, &root());

        assert_eq!(report.failed()[0].reason, "outside project root");
        assert_eq!(report.failed()[0].attempts, 0);
    }
}
