//! Migration framework
//!
//! Provides:
//! - Applier: one migration and its ledger row per transaction
//! - Runner: discover, diff against the ledger, apply in version order
//! - Status: read-only applied / pending / orphaned report

mod applier;
mod runner;
mod status;

pub use applier::apply_migration;
pub use runner::{migrate_db, run_migrations};
pub use status::{migration_status, MigrationStatus};
