//! Error handling for migrator-store
//!
//! Wraps migrator-core ExError with store-specific helpers

use migrator_core::errors::{ExError, ExErrorKind};
use migrator_core::model::Migration;
use std::fmt::Display;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Database unreachable or could not be opened
pub fn connection_error(op: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::ConnectionError)
        .with_op(op.to_string())
        .with_message(format!("Database unreachable: {}", err))
}

/// Ledger table or its containing schema could not be created
pub fn schema_init_error(table: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::SchemaInitError)
        .with_op("ensure_schema")
        .with_message(format!("Failed to initialise ledger {}: {}", table, err))
}

/// Applied versions could not be enumerated
pub fn ledger_read_error(table: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::LedgerReadError)
        .with_op("load_applied")
        .with_message(format!("Failed to read ledger {}: {}", table, err))
}

/// Ledger row could not be inserted
pub fn ledger_write_error(version: i64, name: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::LedgerWriteError)
        .with_op("record_applied")
        .with_version(version)
        .with_migration_name(name)
        .with_message(format!("Failed to record migration: {}", err))
}

/// Migration SQL failed (or its transaction could not be opened)
pub fn migration_exec_error(migration: &Migration, op: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::MigrationExecError)
        .with_op(op.to_string())
        .with_version(migration.version)
        .with_migration_name(migration.name.clone())
        .with_message(format!("Migration failed: {}", err))
}

/// Transaction commit failed
pub fn commit_error(migration: &Migration, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::CommitError)
        .with_op("commit")
        .with_version(migration.version)
        .with_migration_name(migration.name.clone())
        .with_message(format!("Commit failed: {}", err))
}

/// Ledger schema or table name is not a plain SQL identifier
pub fn invalid_identifier(what: &str, value: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("ledger_config")
        .with_message(format!(
            "Invalid ledger {} {:?}: expected [A-Za-z_][A-Za-z0-9_]*",
            what, value
        ))
}
