use std::path::{Path, PathBuf};

use serde::Serialize;

/// Reversible effect of a step that has already committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum JournalEntry {
    DirectoryCreated(PathBuf),
    FileCreated(PathBuf),
    DependenciesInstalled(bool),
}

impl JournalEntry {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::DirectoryCreated(p) | Self::FileCreated(p) => Some(p),
            Self::DependenciesInstalled(_) => None,
        }
    }
}

/// Append-only record of committed effects.
///
/// Insertion order is dependency order: a directory is recorded before any
/// file written into it, so walking the journal backwards always removes
/// contents before their container. Single writer, single reader; the
/// journal is never shared across threads.
#[derive(Debug, Default, Clone)]
pub struct RollbackJournal {
    entries: Vec<JournalEntry>,
}

impl RollbackJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an effect. Must be called immediately after the effect
    /// succeeded and before the next step starts.
    pub fn record(&mut self, entry: JournalEntry) {
        tracing::trace!(?entry, "journal append");
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries newest-first, the order rollback consumes them in.
    pub fn iter_rev(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn dependencies_installed(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e, JournalEntry::DependenciesInstalled(true)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
