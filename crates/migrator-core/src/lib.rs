//! Migrator Core - discovery and planning for forward-only SQL migrations
//!
//! This crate provides the database-independent half of the migrator:
//! - Migration data model
//! - Source reader that discovers `<version>_<name>.up.sql` files
//! - Pending-migration planning against a set of applied versions
//! - Canonical error facility (`ExError`, `ExErrorKind`)
//! - Structured logging facility built on `tracing`

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod plan;
pub mod source;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MigratorError, Result};
pub use model::{AppliedMigration, Migration, SkipReason, SkippedEntry, SourceScan};
pub use plan::MigrationPlan;
pub use source::read_migrations;
