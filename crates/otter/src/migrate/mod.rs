// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Linear SQL migrations.
//!
//! Migrations are registered in a [`Migrator`] and applied in ascending `id`
//! order. Every applied migration is recorded in the `otter_migrations`
//! ledger table, and the ledger must always be an exact prefix of the
//! registered list: a reordered, renamed or removed migration halts the run
//! before anything is changed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut migrator = Migrator::new();
//! migrator.add_migration(
//!     "20240101120000_create_users",
//!     |tx| tx.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT)"),
//!     |tx| tx.execute_batch("DROP TABLE users"),
//! )?;
//!
//! let mut conn = rusqlite::Connection::open("app.db")?;
//! migrator.run_all(&mut conn)?;
//! ```

mod ledger;
mod registry;
mod runner;
pub mod sql_files;

pub use ledger::{LedgerRecord, LEDGER_TABLE};
pub use registry::{Migration, MigrationFn, Migrator};
pub use runner::{MigrationState, MigrationStatus, RunReport, MIGRATION_TIMEOUT};

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The ledger table could not be checked or created.
    #[error("error ensuring migrations table: {0}")]
    EnsureTable(#[source] rusqlite::Error),

    /// The ledger could not be read.
    #[error("error getting migrations: {0}")]
    Query(#[source] rusqlite::Error),

    /// A recorded migration does not match the registered one at its position.
    #[error(
        "migrations don't match, `{registered}` is different to `{recorded}` though they claim to be \
         the same migration, needs manual solving. Migrations ordering cannot be changed once migrated"
    )]
    Diverged {
        /// Registered id at the mismatched position.
        registered: String,
        /// Recorded id at the mismatched position.
        recorded: String,
    },

    /// The ledger records a migration past the end of the registered list.
    #[error(
        "migration `{recorded}` was recorded as applied but is not registered, needs manual solving. \
         Migrations cannot be removed once migrated"
    )]
    UnknownRecorded {
        /// The recorded id with no registered counterpart.
        recorded: String,
    },

    /// A migration's `up` procedure or its ledger insert failed.
    #[error("migration `{id}` failed: {source}")]
    Apply {
        /// The failing migration.
        id: String,
        /// The underlying database error.
        #[source]
        source: rusqlite::Error,
    },

    /// A migration ran past its time budget and was rolled back.
    #[error("migration `{id}` exceeded the {timeout:?} timeout: {source}")]
    Timeout {
        /// The interrupted migration.
        id: String,
        /// The budget that was exceeded.
        timeout: Duration,
        /// The interrupt or busy error reported by SQLite.
        #[source]
        source: rusqlite::Error,
    },

    /// The ledger changed underneath the runner.
    #[error("migration ledger changed while applying `{id}`, another migration run is active")]
    ConcurrentRun {
        /// The migration that was about to be applied.
        id: String,
    },

    /// Some registered migrations have not been applied.
    #[error("there are {remaining} migrations left to run")]
    Pending {
        /// Number of unapplied migrations.
        remaining: usize,
    },

    /// Two migrations were registered with the same id.
    #[error("migration `{0}` is registered more than once")]
    DuplicateId(String),

    /// A migration directory entry has a down file but no up file.
    #[error("migration `{id}` has no up file")]
    MissingUpFile {
        /// The incomplete migration.
        id: String,
    },

    /// A migration description produced an empty file name.
    #[error("invalid migration description {0:?}")]
    InvalidDescription(String),

    /// A migration file already exists.
    #[error("migration file {0:?} already exists")]
    FileExists(PathBuf),

    /// Reading or writing migration files failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`MigrateError`].
pub type Result<T> = std::result::Result<T, MigrateError>;
