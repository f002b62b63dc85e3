//! Database connection management
//!
//! Provides utilities for opening and probing SQLite connections

use crate::errors::{connection_error, Result};
use rusqlite::Connection;
use std::path::Path;

/// Connection string selecting a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path.as_ref()).map_err(|e| {
        connection_error("open", e).with_path(path.as_ref().to_path_buf())
    })
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| connection_error("open", e))
}

/// Open from connection info: a file path, or `:memory:`
pub fn connect(connection_info: &str) -> Result<Connection> {
    if connection_info == IN_MEMORY {
        open_in_memory()
    } else {
        open(connection_info)
    }
}

/// Configure a connection for migration runs
///
/// The default rollback journal is kept: commits that span the main database
/// and an attached ledger schema stay atomic only outside WAL mode.
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| connection_error("configure", e))?;

    Ok(())
}

/// Liveness probe: round-trip a trivial query
pub fn ping(conn: &Connection) -> Result<()> {
    let one: i64 = conn
        .query_row("SELECT 1", [], |row| row.get(0))
        .map_err(|e| connection_error("ping", e))?;

    if one != 1 {
        return Err(connection_error("ping", format!("probe returned {}", one)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migrator_core::ExErrorKind;

    #[test]
    fn test_connect_in_memory() {
        let conn = connect(IN_MEMORY).unwrap();
        assert!(ping(&conn).is_ok());
    }

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        configure(&conn).unwrap();

        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_open_in_missing_directory_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("store.db");

        let err = open(&path).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ConnectionError);
        assert_eq!(err.path(), Some(path.as_path()));
    }
}
