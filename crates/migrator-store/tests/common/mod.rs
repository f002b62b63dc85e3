//! Shared helpers for migrator-store integration tests

#![allow(dead_code)]

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

/// In-memory database configured the way runs configure it
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    migrator_store::db::configure(&conn).expect("Failed to configure database");
    conn
}

/// Temp directory holding the given `(file name, sql)` migrations
pub fn migrations_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, sql) in files {
        write_migration(dir.path(), name, sql);
    }
    dir
}

pub fn write_migration(dir: &Path, name: &str, sql: &str) {
    std::fs::write(dir.join(name), sql).expect("Failed to write migration");
}

/// Whether a table exists in the given schema (`main` for the default)
pub fn table_exists(conn: &Connection, schema: &str, table: &str) -> bool {
    let count: i64 = conn
        .query_row(
            &format!(
                "SELECT COUNT(*) FROM \"{}\".sqlite_master WHERE type = 'table' AND name = ?1",
                schema
            ),
            [table],
            |row| row.get(0),
        )
        .unwrap();
    count > 0
}

/// Versions recorded in `main.schema_migrations`, ascending
pub fn ledger_versions(conn: &Connection) -> Vec<i64> {
    let mut stmt = conn
        .prepare("SELECT version FROM schema_migrations ORDER BY version")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<i64>, _>>()
        .unwrap()
}
