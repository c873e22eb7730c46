// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Applying registered migrations against the ledger.
//!
//! A run goes through these steps:
//!
//! 1. Ensure the ledger table exists
//! 2. Load the ledger in id order
//! 3. Check that the ledger is a prefix of the registered migrations
//! 4. Apply each pending migration in its own transaction
//!
//! Each migration commits together with its ledger row, so an interrupted
//! run leaves exactly the completed migrations recorded.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use tracing::{error, info, warn};

use super::ledger::{count_records, ensure_ledger_table, insert_record, ledger_exists, load_records, LedgerRecord};
use super::registry::{Migration, Migrator};
use super::{MigrateError, Result};

/// Default upper bound on the time a single migration may take, including
/// waiting for the database write lock. See [`Migrator::with_timeout`].
pub const MIGRATION_TIMEOUT: Duration = Duration::from_secs(60);

/// SQLite VM instructions between deadline checks.
const PROGRESS_INTERVAL: i32 = 1000;

/// Outcome of a successful [`Migrator::run_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Migrations applied by this run.
    pub applied: usize,
    /// Migrations registered in total.
    pub total: usize,
}

/// Whether a migration has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationState {
    /// Recorded in the ledger.
    Applied {
        /// Commit time.
        at: DateTime<Utc>,
    },
    /// Not recorded yet.
    Pending,
}

/// A registered migration and its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration id.
    pub id: String,
    /// Applied or pending.
    pub state: MigrationState,
}

impl Migrator {
    /// Applies every pending migration in id order.
    ///
    /// Creates the ledger table when missing, validates the recorded history
    /// and then applies the remaining migrations one transaction at a time.
    /// The first failure rolls back that migration and ends the run.
    ///
    /// # Errors
    ///
    /// - [`MigrateError::Diverged`] / [`MigrateError::UnknownRecorded`] if the
    ///   ledger does not match the registered migrations; nothing is applied
    /// - [`MigrateError::Apply`] if a migration fails
    /// - [`MigrateError::Timeout`] if a migration runs past [`Migrator::timeout`]
    /// - [`MigrateError::ConcurrentRun`] if another runner moved the ledger
    pub fn run_all(&self, conn: &mut Connection) -> Result<RunReport> {
        ensure_ledger_table(conn).map_err(MigrateError::EnsureTable)?;
        let records = load_records(conn).map_err(MigrateError::Query)?;
        self.validate(&records)?;

        let total = self.migrations.len();
        let already = records.len();
        if already == total {
            info!("All migrations already ran");
            return Ok(RunReport { applied: 0, total });
        }
        info!("{}/{} migrations already ran", already, total);
        info!("Running migrations");

        for (position, migration) in self.migrations.iter().enumerate().skip(already) {
            if let Err(e) = apply(conn, position, migration, self.timeout) {
                error!("{}", e);
                return Err(e);
            }
        }

        info!("All migrations ran successfully");
        Ok(RunReport {
            applied: total - already,
            total,
        })
    }

    /// Checks, without changing anything, that every registered migration
    /// has been applied and the ledger matches.
    ///
    /// A missing ledger table counts as nothing applied.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Pending`] with the number of unapplied
    /// migrations, or a validation error if the ledger has diverged.
    pub fn ensure_all_ran(&self, conn: &Connection) -> Result<()> {
        let records = read_ledger(conn)?;
        self.validate(&records)?;

        let remaining = self.migrations.len() - records.len();
        if remaining > 0 {
            return Err(MigrateError::Pending { remaining });
        }

        info!("Migrations are up to date");
        Ok(())
    }

    /// Reports each registered migration as applied or pending.
    ///
    /// Fails with a validation error if the ledger has diverged.
    pub fn status(&self, conn: &Connection) -> Result<Vec<MigrationStatus>> {
        let records = read_ledger(conn)?;
        self.validate(&records)?;

        let statuses = self
            .migrations
            .iter()
            .enumerate()
            .map(|(i, migration)| MigrationStatus {
                id: migration.id().to_string(),
                state: match records.get(i) {
                    Some(record) => MigrationState::Applied {
                        at: record.migrated_at,
                    },
                    None => MigrationState::Pending,
                },
            })
            .collect();
        Ok(statuses)
    }

    /// Checks that `records` is a position-by-position prefix of the
    /// registered migrations.
    fn validate(&self, records: &[LedgerRecord]) -> Result<()> {
        for (i, record) in records.iter().enumerate() {
            let Some(migration) = self.migrations.get(i) else {
                return Err(MigrateError::UnknownRecorded {
                    recorded: record.id.clone(),
                });
            };
            if migration.id() != record.id {
                return Err(MigrateError::Diverged {
                    registered: migration.id().to_string(),
                    recorded: record.id.clone(),
                });
            }
        }
        Ok(())
    }
}

fn read_ledger(conn: &Connection) -> Result<Vec<LedgerRecord>> {
    if !ledger_exists(conn).map_err(MigrateError::Query)? {
        return Ok(Vec::new());
    }
    load_records(conn).map_err(MigrateError::Query)
}

/// Applies one migration under `timeout`.
///
/// The connection's busy timeout is restored afterwards and the progress
/// handler cleared.
fn apply(conn: &mut Connection, position: usize, migration: &Migration, timeout: Duration) -> Result<()> {
    let id = migration.id();
    info!("Running migration {}", id);

    let previous_busy = busy_timeout_ms(conn).map_err(MigrateError::Query)?;
    let deadline = Instant::now() + timeout;
    let failed = |source: rusqlite::Error| {
        let interrupted = matches!(
            source.sqlite_error_code(),
            Some(ErrorCode::OperationInterrupted | ErrorCode::DatabaseBusy)
        );
        if interrupted && Instant::now() >= deadline {
            MigrateError::Timeout {
                id: id.to_string(),
                timeout,
                source,
            }
        } else {
            MigrateError::Apply {
                id: id.to_string(),
                source,
            }
        }
    };

    conn.busy_timeout(timeout).map_err(failed)?;
    conn.progress_handler(PROGRESS_INTERVAL, Some(move || Instant::now() >= deadline));
    let result = apply_in_transaction(conn, position, migration);
    conn.progress_handler(0, None::<fn() -> bool>);
    if let Err(e) = conn.busy_timeout(Duration::from_millis(previous_busy)) {
        warn!("Failed to restore busy timeout: {}", e);
    }

    match result {
        Ok(()) => {
            info!("Migration {} ran successfully", id);
            Ok(())
        }
        Err(Failure::Sql(source)) => Err(failed(source)),
        Err(Failure::LedgerMoved) => Err(MigrateError::ConcurrentRun { id: id.to_string() }),
    }
}

fn busy_timeout_ms(conn: &Connection) -> rusqlite::Result<u64> {
    let ms: i64 = conn.pragma_query_value(None, "busy_timeout", |row| row.get(0))?;
    Ok(u64::try_from(ms).unwrap_or_default())
}

enum Failure {
    Sql(rusqlite::Error),
    LedgerMoved,
}

impl From<rusqlite::Error> for Failure {
    fn from(err: rusqlite::Error) -> Self {
        Failure::Sql(err)
    }
}

fn apply_in_transaction(conn: &mut Connection, position: usize, migration: &Migration) -> std::result::Result<(), Failure> {
    // IMMEDIATE takes the write lock up front, so the ledger count below
    // cannot change before commit.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let outcome = record_in(&tx, position, migration);

    // The deadline must not interrupt the commit or the rollback.
    tx.progress_handler(0, None::<fn() -> bool>);
    match outcome {
        Ok(()) => {
            tx.commit()?;
            Ok(())
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback() {
                warn!("Rollback of migration {} failed: {}", migration.id(), rollback);
            }
            Err(e)
        }
    }
}

fn record_in(tx: &Transaction<'_>, position: usize, migration: &Migration) -> std::result::Result<(), Failure> {
    if count_records(tx)? != position {
        return Err(Failure::LedgerMoved);
    }
    (migration.up())(tx)?;
    insert_record(tx, migration.id(), Utc::now())?;
    Ok(())
}
