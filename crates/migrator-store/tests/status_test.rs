// Integration tests for read-only migration status

mod common;

use common::{ledger_versions, migrations_dir, setup_test_db, table_exists, write_migration};
use migrator_core::ExErrorKind;
use migrator_store::{migration_status, run_migrations, Ledger, LedgerConfig};

#[test]
fn test_status_reports_pending_and_orphaned() {
    // Given: Two applied migrations, one new file and one ledger-only row
    let dir = migrations_dir(&[
        ("0001_a.up.sql", "CREATE TABLE a (id INTEGER);"),
        ("0002_b.up.sql", "CREATE TABLE b (id INTEGER);"),
    ]);
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();
    run_migrations(&mut conn, dir.path(), &ledger).unwrap();

    write_migration(dir.path(), "0003_c.up.sql", "CREATE TABLE c (id INTEGER);");
    write_migration(dir.path(), "notes.txt", "todo");
    conn.execute(
        "INSERT INTO schema_migrations (version, name) VALUES (99, '0099_gone')",
        [],
    )
    .unwrap();

    // When: Status is computed
    let status = migration_status(&conn, dir.path(), &ledger).unwrap();

    // Then: Every category is reported
    let applied: Vec<i64> = status.applied.iter().map(|a| a.version).collect();
    let pending: Vec<i64> = status.pending.iter().map(|m| m.version).collect();
    assert_eq!(applied, vec![1, 2, 99]);
    assert_eq!(pending, vec![3]);
    assert_eq!(status.orphaned, vec![99]);
    assert_eq!(status.skipped.len(), 1);
    assert_eq!(status.skipped[0].file_name, "notes.txt");
    assert!(!status.is_up_to_date());

    // And: Nothing was executed or recorded
    assert!(!table_exists(&conn, "main", "c"));
    assert_eq!(ledger_versions(&conn), vec![1, 2, 99]);
}

#[test]
fn test_status_up_to_date_after_run() {
    let dir = migrations_dir(&[("0001_a.up.sql", "CREATE TABLE a (id INTEGER);")]);
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();
    run_migrations(&mut conn, dir.path(), &ledger).unwrap();

    let status = migration_status(&conn, dir.path(), &ledger).unwrap();

    assert!(status.is_up_to_date());
    assert!(status.orphaned.is_empty());
}

#[test]
fn test_status_on_fresh_database() {
    let dir = migrations_dir(&[("0001_a.up.sql", "CREATE TABLE a (id INTEGER);")]);
    let conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();

    let status = migration_status(&conn, dir.path(), &ledger).unwrap();

    assert!(status.applied.is_empty());
    assert_eq!(status.pending.len(), 1);
}

#[test]
fn test_status_missing_directory() {
    let conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();

    let err = migration_status(&conn, std::path::Path::new("/no/such/migrations"), &ledger)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::PathNotFound);
}
