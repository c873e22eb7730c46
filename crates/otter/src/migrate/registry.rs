// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Migration units and the registry that orders them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Transaction;

use super::{MigrateError, Result, MIGRATION_TIMEOUT};

/// A migration procedure, run inside the migration's transaction.
pub type MigrationFn = Arc<dyn Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync>;

/// A named pair of `up` and `down` procedures.
///
/// By convention the id starts with a sortable timestamp, such as
/// `20240101120000_create_users`, so lexical order is apply order.
#[derive(Clone)]
pub struct Migration {
    id: String,
    up: MigrationFn,
    down: MigrationFn,
}

impl Migration {
    /// Creates a migration from two procedures.
    pub fn new<U, D>(id: impl Into<String>, up: U, down: D) -> Self
    where
        U: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
        D: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            up: Arc::new(up),
            down: Arc::new(down),
        }
    }

    /// The migration id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The forward procedure.
    pub fn up(&self) -> &MigrationFn {
        &self.up
    }

    /// The reverse procedure. Stored for callers; the runner never invokes it.
    pub fn down(&self) -> &MigrationFn {
        &self.down
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration").field("id", &self.id).finish_non_exhaustive()
    }
}

/// An ordered set of migrations.
///
/// Migrations are kept sorted by id as they are added, so registration
/// order does not matter.
#[derive(Debug, Clone)]
pub struct Migrator {
    pub(crate) migrations: Vec<Migration>,
    pub(crate) timeout: Duration,
}

impl Default for Migrator {
    fn default() -> Self {
        Self {
            migrations: Vec::new(),
            timeout: MIGRATION_TIMEOUT,
        }
    }
}

impl Migrator {
    /// Creates an empty registry using [`MIGRATION_TIMEOUT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time budget of each migration, lock waits included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The time budget of each migration.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Registers a migration.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::DuplicateId`] if the id is already registered.
    pub fn add(&mut self, migration: Migration) -> Result<&mut Self> {
        let index = self
            .migrations
            .partition_point(|m| m.id.as_str() < migration.id.as_str());
        if self.migrations.get(index).is_some_and(|m| m.id == migration.id) {
            return Err(MigrateError::DuplicateId(migration.id));
        }
        self.migrations.insert(index, migration);
        Ok(self)
    }

    /// Registers a migration from its id and procedures.
    pub fn add_migration<U, D>(&mut self, id: impl Into<String>, up: U, down: D) -> Result<&mut Self>
    where
        U: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
        D: Fn(&Transaction<'_>) -> rusqlite::Result<()> + Send + Sync + 'static,
    {
        self.add(Migration::new(id, up, down))
    }

    /// Registered migrations in apply order.
    pub fn migrations(&self) -> &[Migration] {
        &self.migrations
    }

    /// Number of registered migrations.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &Transaction<'_>) -> rusqlite::Result<()> {
        Ok(())
    }

    #[test]
    fn test_sorted_by_id_regardless_of_registration_order() {
        let mut migrator = Migrator::new();
        for id in ["2_b", "1_a", "3_c", "10_d"] {
            migrator.add_migration(id, noop, noop).unwrap();
        }
        let ids: Vec<_> = migrator.migrations().iter().map(Migration::id).collect();
        // String order, not numeric order.
        assert_eq!(ids, ["10_d", "1_a", "2_b", "3_c"]);
    }

    #[test]
    fn test_timeout_defaults_to_one_minute() {
        assert_eq!(Migrator::new().timeout(), Duration::from_secs(60));
        let migrator = Migrator::new().with_timeout(Duration::from_millis(250));
        assert_eq!(migrator.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut migrator = Migrator::new();
        migrator.add_migration("1_a", noop, noop).unwrap();
        let err = migrator.add_migration("1_a", noop, noop).unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateId(id) if id == "1_a"));
        assert_eq!(migrator.len(), 1);
    }

    #[test]
    fn test_down_is_kept() {
        let mut conn = rusqlite::Connection::open_in_memory().unwrap();
        let migration = Migration::new("1_a", noop, |tx: &Transaction<'_>| {
            tx.execute_batch("CREATE TABLE reverted (id INTEGER)")
        });

        let tx = conn.transaction().unwrap();
        (migration.down())(&tx).unwrap();
        tx.commit().unwrap();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE name = 'reverted')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists);
    }
}
