use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::DeleteKind;

/// Outcome of a rollback pass: what was reversed and what was not.
///
/// Used only for the terminal diagnostic. Every artifact the engine could
/// not remove must appear in `failed`.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackReport {
    removed: Vec<RemovedArtifact>,
    failed: Vec<FailedArtifact>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedArtifact {
    pub path: PathBuf,
    pub kind: DeleteKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedArtifact {
    pub path: PathBuf,
    pub kind: DeleteKind,
    pub attempts: u32,
    pub reason: String,
}

impl RollbackReport {
    pub fn start() -> Self {
        Self {
            removed: Vec::new(),
            failed: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a removal. A path already reported (journaled twice, e.g. a
    /// `package.json` produced by a command and later rewritten) is kept once.
    pub fn record_removed(&mut self, path: &Path, kind: DeleteKind) {
        if self.removed.iter().any(|r| r.path == path) {
            return;
        }
        self.removed.push(RemovedArtifact {
            path: path.to_path_buf(),
            kind,
        });
    }

    pub fn record_failed(
        &mut self,
        path: &Path,
        kind: DeleteKind,
        attempts: u32,
        reason: impl Into<String>,
    ) {
        if self.failed.iter().any(|f| f.path == path) {
            return;
        }
        self.failed.push(FailedArtifact {
            path: path.to_path_buf(),
            kind,
            attempts,
            reason: reason.into(),
        });
    }

    /// Move failures whose path is gone (taken by a later recursive delete
    /// of a parent) over to `removed`.
    pub fn reconcile(&mut self, mut is_gone: impl FnMut(&Path) -> bool) {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.failed)
            .into_iter()
            .partition(|f| is_gone(&f.path));
        self.failed = kept;
        for artifact in gone {
            self.record_removed(&artifact.path, artifact.kind);
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn removed(&self) -> &[RemovedArtifact] {
        &self.removed
    }

    pub fn failed(&self) -> &[FailedArtifact] {
        &self.failed
    }

    /// `true` when every journaled artifact was reversed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}
