// Lifecycle logging emitted by the runner
// Tests share one global capture subscriber, so each filters on its own
// temp directory path and run id.

mod common;

use common::{migrations_dir, setup_test_db};
use migrator_core::logging_facility::test_capture::{init_test_capture, CapturedEvent};
use migrator_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_APPLIED, FIELD_DISCOVERED, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_MIGRATIONS_PATH, FIELD_MIGRATION_NAME,
    FIELD_MIGRATION_VERSION, FIELD_RUN_ID,
};
use migrator_store::{run_migrations, Ledger, LedgerConfig};

fn run_events(events: &[CapturedEvent], run_id: &str) -> Vec<CapturedEvent> {
    events
        .iter()
        .filter(|e| e.field(FIELD_RUN_ID) == Some(run_id))
        .cloned()
        .collect()
}

#[test]
fn test_successful_run_logs_start_and_end() {
    let capture = init_test_capture();
    let dir = migrations_dir(&[
        ("0001_a.up.sql", "CREATE TABLE a (id INTEGER);"),
        ("0002_b.up.sql", "CREATE TABLE b (id INTEGER);"),
    ]);
    let path = dir.path().display().to_string();
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();

    run_migrations(&mut conn, dir.path(), &ledger).unwrap();

    let events = capture.events_with_field(FIELD_MIGRATIONS_PATH, &path);
    let start = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .expect("start event");
    assert_eq!(start.op.as_deref(), Some("run_migrations"));

    let end = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END))
        .expect("end event");
    assert_eq!(end.field(FIELD_APPLIED), Some("2"));
    assert!(end.field(FIELD_DURATION_MS).is_some());

    // One info line per applied migration, tied to the run
    let run_id = start.field(FIELD_RUN_ID).expect("run_id on start event");
    let same_run = run_events(&capture.events(), run_id);
    let applied_lines = same_run
        .iter()
        .filter(|e| e.message.as_deref() == Some("applied migration"))
        .count();
    assert_eq!(applied_lines, 2);

    // Discovery count is reported once per run
    let scanned = same_run
        .iter()
        .find(|e| e.message.as_deref() == Some("scanned migrations directory"))
        .expect("scan line");
    assert_eq!(scanned.field(FIELD_DISCOVERED), Some("2"));
}

#[test]
fn test_rerun_logs_already_applied() {
    let capture = init_test_capture();
    let dir = migrations_dir(&[("0001_a.up.sql", "CREATE TABLE a (id INTEGER);")]);
    let path = dir.path().display().to_string();
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();
    run_migrations(&mut conn, dir.path(), &ledger).unwrap();
    run_migrations(&mut conn, dir.path(), &ledger).unwrap();

    let events = capture.events_with_field(FIELD_MIGRATIONS_PATH, &path);
    let ends: Vec<_> = events
        .iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 2);
    assert_eq!(ends[1].field(FIELD_APPLIED), Some("0"));

    let run_id = ends[1].field(FIELD_RUN_ID).unwrap();
    let same_run = run_events(&capture.events(), run_id);
    let skipped = same_run
        .iter()
        .find(|e| e.message.as_deref() == Some("migration already applied"))
        .expect("already-applied line");
    assert_eq!(skipped.field(FIELD_MIGRATION_VERSION), Some("1"));
    assert_eq!(skipped.field(FIELD_MIGRATION_NAME), Some("0001_a"));
    assert!(same_run
        .iter()
        .any(|e| e.message.as_deref() == Some("database is up to date")));
}

#[test]
fn test_failed_run_logs_end_error_with_code() {
    let capture = init_test_capture();
    let dir = migrations_dir(&[("0001_broken.up.sql", "CREATE TABLE (;")]);
    let path = dir.path().display().to_string();
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();

    let err = run_migrations(&mut conn, dir.path(), &ledger).unwrap_err();

    let events = capture.events_with_field(FIELD_MIGRATIONS_PATH, &path);
    let failure = events
        .iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("end_error event");
    assert_eq!(failure.level, tracing::Level::ERROR);
    assert_eq!(failure.field(FIELD_ERR_CODE), Some(err.kind().code()));
    assert_eq!(failure.field(FIELD_ERR_CODE), Some("ERR_MIGRATION_EXEC"));
    assert_eq!(failure.field(FIELD_ERR_KIND), Some("MigrationExecError"));
    assert!(!events.iter().any(|e| e.event.as_deref() == Some(EVENT_END)));
}

#[test]
fn test_skipped_entries_are_warned() {
    let capture = init_test_capture();
    let dir = migrations_dir(&[
        ("0001_a.up.sql", "CREATE TABLE a (id INTEGER);"),
        ("0001_a.down.sql", "DROP TABLE a;"),
    ]);
    let path = dir.path().display().to_string();
    let mut conn = setup_test_db();
    let ledger = Ledger::new(LedgerConfig::default()).unwrap();

    run_migrations(&mut conn, dir.path(), &ledger).unwrap();

    let start = capture
        .events_with_field(FIELD_MIGRATIONS_PATH, &path)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_START))
        .unwrap();
    let run_id = start.field(FIELD_RUN_ID).unwrap().to_string();
    let warned = run_events(&capture.events(), &run_id)
        .into_iter()
        .any(|e| e.level == tracing::Level::WARN && e.field("file") == Some("0001_a.down.sql"));
    assert!(warned);
}
