// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The `otter_migrations` ledger table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "otter_migrations";

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    /// Migration id.
    pub id: String,
    /// When the migration was committed.
    pub migrated_at: DateTime<Utc>,
}

/// Returns whether the ledger table exists.
pub(crate) fn ledger_exists(conn: &Connection) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        params![LEDGER_TABLE],
        |row| row.get(0),
    )
}

/// Creates the ledger table if it is missing.
pub(crate) fn ensure_ledger_table(conn: &Connection) -> rusqlite::Result<()> {
    if ledger_exists(conn)? {
        return Ok(());
    }

    info!("Creating migrations table");
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS otter_migrations (
            id VARCHAR PRIMARY KEY NOT NULL,
            migrated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )?;
    info!("Migrations table created");
    Ok(())
}

/// Loads all records ordered by id.
pub(crate) fn load_records(conn: &Connection) -> rusqlite::Result<Vec<LedgerRecord>> {
    let mut stmt = conn.prepare("SELECT id, migrated_at FROM otter_migrations ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(LedgerRecord {
            id: row.get(0)?,
            migrated_at: row.get(1)?,
        })
    })?;
    rows.collect()
}

/// Counts recorded migrations.
pub(crate) fn count_records(conn: &Connection) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM otter_migrations", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or_default())
}

/// Records `id` as applied at `migrated_at`.
pub(crate) fn insert_record(conn: &Connection, id: &str, migrated_at: DateTime<Utc>) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO otter_migrations (id, migrated_at) VALUES (?1, ?2)",
        params![id, migrated_at],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_ensure_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!ledger_exists(&conn).unwrap());

        ensure_ledger_table(&conn).unwrap();
        ensure_ledger_table(&conn).unwrap();
        assert!(ledger_exists(&conn).unwrap());
        assert_eq!(count_records(&conn).unwrap(), 0);
    }

    #[test]
    fn test_records_come_back_in_id_order() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_ledger_table(&conn).unwrap();

        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        insert_record(&conn, "2_b", at).unwrap();
        insert_record(&conn, "1_a", at).unwrap();

        let records = load_records(&conn).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1_a", "2_b"]);
        assert_eq!(records[0].migrated_at, at);
    }

    #[test]
    fn test_duplicate_insert_fails() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_ledger_table(&conn).unwrap();
        insert_record(&conn, "1_a", Utc::now()).unwrap();
        assert!(insert_record(&conn, "1_a", Utc::now()).is_err());
    }
}
