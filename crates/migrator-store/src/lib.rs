//! Migrator Store - SQLite persistence for the migration ledger
//!
//! Provides:
//! - Connection helpers (open, configure, liveness probe)
//! - The version ledger, in `main` or in a dedicated attached schema
//! - The applier (one migration + its ledger row per transaction)
//! - The orchestrated run and a read-only status report

pub mod db;
pub mod errors;
pub mod ledger;
pub mod migrations;

// Re-export key types
pub use errors::Result;
pub use ledger::{Ledger, LedgerConfig, DEFAULT_LEDGER_TABLE};
pub use migrations::{migrate_db, migration_status, run_migrations, MigrationStatus};
