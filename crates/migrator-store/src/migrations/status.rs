//! Read-only migration status
//!
//! Reports what the ledger holds against what is on disk without executing
//! any migration SQL.

use crate::db;
use crate::errors::Result;
use crate::ledger::Ledger;
use migrator_core::model::{AppliedMigration, Migration, SkippedEntry};
use migrator_core::plan::MigrationPlan;
use migrator_core::source;
use migrator_core::{log_op_end, log_op_error, log_op_start};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

/// Applied, pending and orphaned migrations for one directory and ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Ledger rows, ordered by version
    pub applied: Vec<AppliedMigration>,
    /// Files on disk not yet in the ledger, ordered by version
    pub pending: Vec<Migration>,
    /// Ledger versions with no file on disk
    pub orphaned: Vec<i64>,
    /// Directory entries that are not migrations
    pub skipped: Vec<SkippedEntry>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Compare the ledger with the migrations in `migrations_path`
///
/// Creates the ledger table if it does not exist yet; nothing else is written.
///
/// ## Errors
///
/// Same discovery and ledger errors as a run: `PathNotFound`,
/// `ConnectionError`, `SchemaInitError`, `LedgerReadError`,
/// `InvalidMigrationName`, `FileReadError`.
pub fn migration_status(
    conn: &Connection,
    migrations_path: &Path,
    ledger: &Ledger,
) -> Result<MigrationStatus> {
    let path = migrations_path.display().to_string();
    log_op_start!("migration_status", path = path.as_str());
    let start = Instant::now();

    let status = migration_status_impl(conn, migrations_path, ledger).map_err(|e| {
        log_op_error!(
            "migration_status",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            path = path.as_str()
        );
        e
    })?;

    log_op_end!(
        "migration_status",
        duration_ms = start.elapsed().as_millis() as u64,
        path = path.as_str(),
        pending = status.pending.len() as u64
    );

    Ok(status)
}

fn migration_status_impl(
    conn: &Connection,
    migrations_path: &Path,
    ledger: &Ledger,
) -> Result<MigrationStatus> {
    source::ensure_dir(migrations_path)?;
    db::ping(conn)?;

    ledger.ensure_schema(conn)?;
    let applied = ledger.list_applied(conn)?;
    let applied_versions: BTreeSet<i64> = applied.iter().map(|a| a.version).collect();

    let scan = source::read_migrations(migrations_path)?;
    let orphaned = MigrationPlan::orphaned(&scan.migrations, &applied_versions);
    let plan = MigrationPlan::build(scan.migrations, &applied_versions);

    Ok(MigrationStatus {
        applied,
        pending: plan.pending,
        orphaned,
        skipped: scan.skipped,
    })
}
