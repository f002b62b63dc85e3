//! Version ledger
//!
//! One table recording which migration versions have been applied. Rows are
//! inserted once, inside the transaction that ran the migration, and never
//! updated or deleted.
//!
//! The table lives either in `main` or in a dedicated schema. SQLite has no
//! `CREATE SCHEMA`; a schema is an attached database, so a configured schema
//! that is not attached yet gets a sibling file `<main-stem>.<schema>.db`
//! next to the main database (or a private in-memory database when the main
//! database is in-memory).

use crate::errors::{
    invalid_identifier, ledger_read_error, ledger_write_error, schema_init_error, Result,
};
use chrono::{DateTime, NaiveDateTime};
use migrator_core::model::AppliedMigration;
use rusqlite::types::Value;
use rusqlite::{Connection, Transaction};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Table name used when none is configured
pub const DEFAULT_LEDGER_TABLE: &str = "schema_migrations";

/// Schemas every SQLite connection already has
const BUILTIN_SCHEMAS: [&str; 2] = ["main", "temp"];

/// Where the ledger table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Dedicated schema; `None` means the connection's `main` schema
    pub schema: Option<String>,
    pub table: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            schema: None,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }
}

impl LedgerConfig {
    /// Default table inside a dedicated schema
    pub fn namespaced(schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

/// Validated ledger location plus the operations against it
#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
    qualified_table: String,
}

impl Ledger {
    /// Validate `config` and build the qualified table name
    pub fn new(config: LedgerConfig) -> Result<Self> {
        if !is_identifier(&config.table) {
            return Err(invalid_identifier("table", &config.table));
        }

        let qualified_table = match &config.schema {
            Some(schema) if !is_identifier(schema) => {
                return Err(invalid_identifier("schema", schema));
            }
            Some(schema) => format!("{}.{}", quote(schema), quote(&config.table)),
            None => quote(&config.table),
        };

        Ok(Self {
            config,
            qualified_table,
        })
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Quoted, schema-qualified table name as used in SQL
    pub fn qualified_table(&self) -> &str {
        &self.qualified_table
    }

    /// Create the ledger table (and its schema) if absent
    ///
    /// Safe to call on every startup. Attachments are per-connection, so a
    /// namespaced ledger must go through this before any other ledger call on
    /// a fresh connection.
    pub fn ensure_schema(&self, conn: &Connection) -> Result<()> {
        if let Some(schema) = &self.config.schema {
            self.ensure_namespace(conn, schema)?;
        }

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                version INTEGER PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );",
            self.qualified_table
        ))
        .map_err(|e| schema_init_error(&self.qualified_table, e))?;

        tracing::debug!(ledger = %self.qualified_table, "ledger table ready");
        Ok(())
    }

    fn ensure_namespace(&self, conn: &Connection, schema: &str) -> Result<()> {
        if BUILTIN_SCHEMAS
            .iter()
            .any(|builtin| builtin.eq_ignore_ascii_case(schema))
        {
            return Ok(());
        }

        let attached = attached_databases(conn)
            .map_err(|e| schema_init_error(&self.qualified_table, e))?;

        if attached
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(schema))
        {
            return Ok(());
        }

        let main_file = attached
            .iter()
            .find(|(name, _)| name == "main")
            .map(|(_, file)| file.as_str())
            .unwrap_or_default();
        let target = schema_file(main_file, schema);
        let target_str = target.to_string_lossy().into_owned();

        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", quote(schema)),
            [target_str],
        )
        .map_err(|e| schema_init_error(&self.qualified_table, e))?;

        tracing::debug!(schema, file = %target.display(), "attached ledger schema");
        Ok(())
    }

    /// Every version currently recorded
    pub fn load_applied(&self, conn: &Connection) -> Result<BTreeSet<i64>> {
        let mut stmt = conn
            .prepare(&format!("SELECT version FROM {}", self.qualified_table))
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?;

        let versions = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?
            .collect::<std::result::Result<BTreeSet<_>, _>>()
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?;

        Ok(versions)
    }

    /// Full ledger rows, ordered by version
    pub fn list_applied(&self, conn: &Connection) -> Result<Vec<AppliedMigration>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT version, name, applied_at FROM {} ORDER BY version",
                self.qualified_table
            ))
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(AppliedMigration {
                    version: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: parse_timestamp(row.get(2)?),
                })
            })
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ledger_read_error(&self.qualified_table, e))?;

        Ok(rows)
    }

    /// Insert one ledger row inside the caller's transaction
    ///
    /// A duplicate version violates the primary key and fails the insert.
    pub fn record_applied(&self, tx: &Transaction<'_>, version: i64, name: &str) -> Result<()> {
        tx.execute(
            &format!(
                "INSERT INTO {} (version, name) VALUES (?1, ?2)",
                self.qualified_table
            ),
            rusqlite::params![version, name],
        )
        .map_err(|e| ledger_write_error(version, name, e))?;

        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

/// `(name, file)` for every database attached to the connection
fn attached_databases(conn: &Connection) -> rusqlite::Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("PRAGMA database_list")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(1)?, row.get::<_, Option<String>>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows
        .into_iter()
        .map(|(name, file)| (name, file.unwrap_or_default()))
        .collect())
}

/// Backing file for a dedicated schema, next to the main database file
fn schema_file(main_file: &str, schema: &str) -> PathBuf {
    if main_file.is_empty() {
        return PathBuf::from(crate::db::IN_MEMORY);
    }

    let main = Path::new(main_file);
    let stem = main
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "migrator".to_string());
    main.with_file_name(format!("{}.{}.db", stem, schema))
}

/// Read an `applied_at` cell
///
/// Rows written by this tool hold `CURRENT_TIMESTAMP` text. Rows written by
/// other tools may carry ISO 8601 / RFC 3339 text or unix seconds; anything
/// else reads as `None` instead of failing the listing.
fn parse_timestamp(value: Value) -> Option<NaiveDateTime> {
    match value {
        Value::Text(raw) => {
            let raw = raw.trim();
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
                .ok()
                .or_else(|| {
                    DateTime::parse_from_rfc3339(raw)
                        .ok()
                        .map(|dt| dt.naive_utc())
                })
        }
        Value::Integer(secs) => DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc()),
        Value::Real(secs) => {
            DateTime::from_timestamp(secs.trunc() as i64, 0).map(|dt| dt.naive_utc())
        }
        Value::Null | Value::Blob(_) => None,
    }
}
