//! Migration runner
//!
//! Discovers migrations, diffs them against the ledger and applies the
//! pending ones in ascending version order.
//!
//! ## Logging Ownership
//!
//! The runner owns lifecycle logging for a run:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success, with the count applied in this run
//! - `log_op_error!` on failure
//!
//! plus the info/warn lines for skipped entries and already-applied
//! versions. Ledger, applier and reader only emit `tracing::debug!()`.

use crate::db;
use crate::errors::Result;
use crate::ledger::{Ledger, LedgerConfig};
use crate::migrations::applier::apply_migration;
use migrator_core::plan::MigrationPlan;
use migrator_core::source;
use migrator_core::{log_op_end, log_op_error, log_op_start};
use migrator_core_types::RunId;
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Open `connection_info` and apply every pending migration in `migrations_path`
///
/// The directory is checked before any connection is made.
///
/// ## Returns
///
/// Number of migrations applied by this call (not the total ever applied)
///
/// ## Errors
///
/// - `InvalidInput`: `ledger_config` names an invalid schema or table
/// - `PathNotFound`: `migrations_path` is missing
/// - `ConnectionError`: the database cannot be opened or probed
/// - anything [`run_migrations`] returns
pub fn migrate_db(
    connection_info: &str,
    migrations_path: &Path,
    ledger_config: &LedgerConfig,
) -> Result<usize> {
    let ledger = Ledger::new(ledger_config.clone())?;
    source::ensure_dir(migrations_path)?;

    let mut conn = db::connect(connection_info)?;
    db::configure(&conn)?;

    run_migrations(&mut conn, migrations_path, &ledger)
}

/// Apply every pending migration in `migrations_path` over `conn`
///
/// Stops at the first failure. Migrations committed earlier in the same run
/// stay committed.
///
/// ## Errors
///
/// - `PathNotFound`: directory missing
/// - `ConnectionError`: liveness probe failed
/// - `SchemaInitError`: ledger could not be created
/// - `LedgerReadError`: applied versions could not be read
/// - `InvalidMigrationName` / `FileReadError`: discovery failed; nothing applied
/// - `MigrationExecError` / `LedgerWriteError` / `CommitError`: a migration failed
pub fn run_migrations(
    conn: &mut Connection,
    migrations_path: &Path,
    ledger: &Ledger,
) -> Result<usize> {
    let run_id = RunId::new();
    let path = migrations_path.display().to_string();

    log_op_start!(
        "run_migrations",
        run_id = %run_id,
        path = path.as_str(),
        ledger = ledger.qualified_table()
    );
    let start = Instant::now();

    let applied = run_migrations_impl(conn, migrations_path, ledger, &run_id).map_err(|e| {
        let e = e.with_run_id(run_id.clone());
        log_op_error!(
            "run_migrations",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = %run_id,
            path = path.as_str()
        );
        e
    })?;

    log_op_end!(
        "run_migrations",
        duration_ms = start.elapsed().as_millis() as u64,
        run_id = %run_id,
        path = path.as_str(),
        applied = applied as u64
    );

    Ok(applied)
}

fn run_migrations_impl(
    conn: &mut Connection,
    migrations_path: &Path,
    ledger: &Ledger,
    run_id: &RunId,
) -> Result<usize> {
    source::ensure_dir(migrations_path)?;
    db::ping(conn)?;

    ledger.ensure_schema(conn)?;
    let applied_versions = ledger.load_applied(conn)?;

    let scan = source::read_migrations(migrations_path)?;
    tracing::debug!(
        run_id = %run_id,
        discovered = scan.migrations.len() as u64,
        applied_before = applied_versions.len() as u64,
        "scanned migrations directory"
    );

    for entry in &scan.skipped {
        tracing::warn!(
            run_id = %run_id,
            file = %entry.file_name,
            reason = %entry.reason,
            "ignoring entry in migrations directory"
        );
    }

    if scan.migrations.is_empty() {
        tracing::info!(run_id = %run_id, "no migrations found");
        return Ok(0);
    }

    let plan = MigrationPlan::build(scan.migrations, &applied_versions);

    for migration in &plan.already_applied {
        tracing::info!(
            run_id = %run_id,
            version = migration.version,
            migration = %migration.name,
            "migration already applied"
        );
    }

    if plan.is_up_to_date() {
        tracing::info!(run_id = %run_id, "database is up to date");
        return Ok(0);
    }

    let mut applied = 0usize;
    for migration in &plan.pending {
        let started = Instant::now();
        apply_migration(conn, ledger, migration)?;
        applied += 1;

        tracing::info!(
            run_id = %run_id,
            version = migration.version,
            migration = %migration.name,
            duration_ms = started.elapsed().as_millis() as u64,
            "applied migration"
        );
    }

    Ok(applied)
}
