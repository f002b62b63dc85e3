//! Migration applier
//!
//! Runs one migration's SQL and records its version in a single transaction,
//! so the schema change and its ledger row are visible together or not at all.

use crate::errors::{commit_error, migration_exec_error, Result};
use crate::ledger::Ledger;
use migrator_core::model::Migration;
use rusqlite::Connection;

/// Apply a single pending migration
///
/// The transaction rolls back when dropped without a successful commit,
/// which covers every early return below as well as a failed `COMMIT`.
///
/// ## Errors
///
/// - `MigrationExecError`: the transaction could not start, or the SQL failed
/// - `LedgerWriteError`: the ledger row could not be inserted (e.g. duplicate version)
/// - `CommitError`: `COMMIT` failed (e.g. a deferred constraint)
pub fn apply_migration(
    conn: &mut Connection,
    ledger: &Ledger,
    migration: &Migration,
) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| migration_exec_error(migration, "begin_transaction", e))?;

    tx.execute_batch(&migration.sql)
        .map_err(|e| migration_exec_error(migration, "execute_migration", e))?;

    ledger.record_applied(&tx, migration.version, &migration.name)?;

    tx.commit().map_err(|e| commit_error(migration, e))?;

    tracing::debug!(
        version = migration.version,
        migration = %migration.name,
        "migration committed"
    );
    Ok(())
}
