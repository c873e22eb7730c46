// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the migration runner against a real SQLite file.

use std::sync::{Arc, Mutex};

use otter::migrate::{MigrateError, Migrator};
use rusqlite::{Connection, Transaction};
use tempfile::TempDir;

fn noop(_: &Transaction<'_>) -> rusqlite::Result<()> {
    Ok(())
}

fn open(dir: &TempDir) -> Connection {
    Connection::open(dir.path().join("app.db")).unwrap()
}

fn ledger_ids(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT id FROM otter_migrations ORDER BY id")
        .unwrap();
    let rows = stmt.query_map([], |row| row.get(0)).unwrap();
    rows.collect::<Result<_, _>>().unwrap()
}

/// Registers a migration that appends its id to `log` when applied.
fn logged(migrator: &mut Migrator, log: &Arc<Mutex<Vec<String>>>, id: &str) {
    let log = Arc::clone(log);
    let owned = id.to_string();
    migrator
        .add_migration(
            id,
            move |_tx| {
                log.lock().unwrap().push(owned.clone());
                Ok(())
            },
            noop,
        )
        .unwrap();
}

#[test]
fn test_applies_in_id_order() {
    let dir = TempDir::new().unwrap();
    let mut conn = open(&dir);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut migrator = Migrator::new();
    for id in ["2_b", "1_a", "3_c"] {
        logged(&mut migrator, &log, id);
    }

    let report = migrator.run_all(&mut conn).unwrap();
    assert_eq!(report.applied, 3);
    assert_eq!(*log.lock().unwrap(), ["1_a", "2_b", "3_c"]);
    assert_eq!(ledger_ids(&conn), ["1_a", "2_b", "3_c"]);
}

#[test]
fn test_second_run_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut migrator = Migrator::new();
    logged(&mut migrator, &log, "1_a");
    logged(&mut migrator, &log, "2_b");

    let mut conn = open(&dir);
    assert_eq!(migrator.run_all(&mut conn).unwrap().applied, 2);
    drop(conn);

    let mut conn = open(&dir);
    let report = migrator.run_all(&mut conn).unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(report.total, 2);
    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(ledger_ids(&conn).len(), 2);
    migrator.ensure_all_ran(&conn).unwrap();
}

#[test]
fn test_only_new_migrations_run_later() {
    let dir = TempDir::new().unwrap();
    let mut conn = open(&dir);
    let log = Arc::new(Mutex::new(Vec::new()));

    let mut migrator = Migrator::new();
    logged(&mut migrator, &log, "1_a");
    migrator.run_all(&mut conn).unwrap();

    logged(&mut migrator, &log, "2_b");
    assert!(matches!(
        migrator.ensure_all_ran(&conn),
        Err(MigrateError::Pending { remaining: 1 })
    ));
    assert_eq!(migrator.run_all(&mut conn).unwrap().applied, 1);
    assert_eq!(*log.lock().unwrap(), ["1_a", "2_b"]);
}

#[test]
fn test_divergent_history_halts_before_applying() {
    let dir = TempDir::new().unwrap();
    let mut conn = open(&dir);

    let mut original = Migrator::new();
    original.add_migration("1_a", noop, noop).unwrap();
    original.run_all(&mut conn).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    let mut renamed = Migrator::new();
    logged(&mut renamed, &log, "1_b");
    logged(&mut renamed, &log, "2_c");

    let err = renamed.run_all(&mut conn).unwrap_err();
    match &err {
        MigrateError::Diverged { registered, recorded } => {
            assert_eq!(registered, "1_b");
            assert_eq!(recorded, "1_a");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("ordering cannot be changed once migrated"));
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(ledger_ids(&conn), ["1_a"]);

    assert!(matches!(
        renamed.ensure_all_ran(&conn),
        Err(MigrateError::Diverged { .. })
    ));
}

#[test]
fn test_inserted_earlier_migration_is_detected() {
    let dir = TempDir::new().unwrap();
    let mut conn = open(&dir);

    let mut migrator = Migrator::new();
    migrator.add_migration("2_b", noop, noop).unwrap();
    migrator.run_all(&mut conn).unwrap();

    migrator.add_migration("1_a", noop, noop).unwrap();
    assert!(matches!(
        migrator.run_all(&mut conn),
        Err(MigrateError::Diverged { registered, recorded }) if registered == "1_a" && recorded == "2_b"
    ));
}

#[test]
fn test_failure_keeps_earlier_migrations_and_rolls_back_the_failing_one() {
    let dir = TempDir::new().unwrap();
    let mut conn = open(&dir);

    let mut migrator = Migrator::new();
    migrator
        .add_migration("1", |tx| tx.execute_batch("CREATE TABLE one (id INTEGER)"), noop)
        .unwrap();
    migrator
        .add_migration("2", |tx| tx.execute_batch("CREATE TABLE two (id INTEGER)"), noop)
        .unwrap();
    migrator
        .add_migration(
            "3",
            |tx| tx.execute_batch("CREATE TABLE three (id INTEGER); INSERT INTO missing VALUES (1);"),
            noop,
        )
        .unwrap();
    migrator
        .add_migration("4", |tx| tx.execute_batch("CREATE TABLE four (id INTEGER)"), noop)
        .unwrap();
    migrator
        .add_migration("5", |tx| tx.execute_batch("CREATE TABLE five (id INTEGER)"), noop)
        .unwrap();

    let err = migrator.run_all(&mut conn).unwrap_err();
    assert!(matches!(&err, MigrateError::Apply { id, .. } if id == "3"));
    assert_eq!(ledger_ids(&conn), ["1", "2"]);

    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name != 'otter_migrations' ORDER BY name")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    // `three` was rolled back with the failing migration.
    assert_eq!(tables, ["one", "two"]);

    assert!(matches!(
        migrator.ensure_all_ran(&conn),
        Err(MigrateError::Pending { remaining: 3 })
    ));
}
