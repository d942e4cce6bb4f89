use std::collections::HashSet;

use storage::models::{HistoricalDriverKey, NewHistoricalDriver};

/// Outcome of offering one normalized row to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Staged,
    AlreadyArchived,
    DuplicateInBatch,
}

/// Inserts staged for one historical import, deduplicated on the natural key.
///
/// Lookups against the archive are the caller's job; the batch only tracks
/// what this run has staged so far, so a row repeated in the source is
/// inserted once.
#[derive(Debug, Default)]
pub struct HistoricalBatch {
    staged_keys: HashSet<HistoricalDriverKey>,
    inserts: Vec<NewHistoricalDriver>,
    skipped: usize,
}

impl HistoricalBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_staged(&self, key: &HistoricalDriverKey) -> bool {
        self.staged_keys.contains(key)
    }

    pub fn stage(&mut self, row: NewHistoricalDriver, already_archived: bool) -> StageOutcome {
        if already_archived {
            self.skipped += 1;
            return StageOutcome::AlreadyArchived;
        }

        if !self.staged_keys.insert(row.key()) {
            self.skipped += 1;
            return StageOutcome::DuplicateInBatch;
        }

        self.inserts.push(row);
        StageOutcome::Staged
    }

    pub fn inserts(&self) -> &[NewHistoricalDriver] {
        &self.inserts
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
