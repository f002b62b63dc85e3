//! Pending-migration planning
//!
//! Pure diff between what is on disk and what the ledger has recorded.

use crate::model::Migration;
use std::collections::BTreeSet;

/// Discovered migrations split by ledger membership
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Not yet recorded, in ascending version order
    pub pending: Vec<Migration>,
    /// Already recorded, in ascending version order
    pub already_applied: Vec<Migration>,
}

impl MigrationPlan {
    /// Split `discovered` against the `applied` version set
    ///
    /// Input order is preserved within each half; the reader hands
    /// migrations over sorted by version.
    pub fn build(discovered: Vec<Migration>, applied: &BTreeSet<i64>) -> Self {
        let (already_applied, pending) = discovered
            .into_iter()
            .partition(|m| applied.contains(&m.version));

        Self {
            pending,
            already_applied,
        }
    }

    /// Ledger versions that have no matching file on disk
    pub fn orphaned(discovered: &[Migration], applied: &BTreeSet<i64>) -> Vec<i64> {
        let on_disk: BTreeSet<i64> = discovered.iter().map(|m| m.version).collect();
        applied.difference(&on_disk).copied().collect()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}
