// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Migration commands backed by SQL files in the migrations directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use console::style;
use otter::migrate::{sql_files, MigrationState, Migrator, RunReport};
use rusqlite::Connection;

use crate::config::Config;

/// Applies all pending migrations.
pub fn up(config: &Config, root: &Path) -> anyhow::Result<()> {
    let migrator = load_migrator(config, root)?;
    let mut conn = open_database(config, root)?;

    let RunReport { applied, total } = migrator.run_all(&mut conn)?;
    if applied == 0 {
        println!("{} Already up to date ({} migrations)", style("✓").green(), total);
    } else {
        println!(
            "{} Applied {} of {} migrations",
            style("✓").green(),
            style(applied).bold(),
            total
        );
    }
    Ok(())
}

/// Lists every migration with its state and fails if any are pending.
pub fn status(config: &Config, root: &Path) -> anyhow::Result<()> {
    let migrator = load_migrator(config, root)?;
    let conn = open_database(config, root)?;

    for status in migrator.status(&conn)? {
        match status.state {
            MigrationState::Applied { at } => println!(
                "  {}  {}  {}",
                style("applied").green(),
                status.id,
                style(at.format("%Y-%m-%d %H:%M:%S UTC")).dim()
            ),
            MigrationState::Pending => println!("  {}  {}", style("pending").yellow(), status.id),
        }
    }

    migrator.ensure_all_ran(&conn)?;
    Ok(())
}

/// Creates an up/down SQL file pair for a new migration.
pub fn new(config: &Config, root: &Path, description: &str) -> anyhow::Result<()> {
    let dir = config.migrations_dir(root);
    let (up, down) = sql_files::new_migration_files(&dir, description, Local::now().naive_local())?;

    println!("Created migration:");
    println!("  {}", style(display_relative(&up, root)).cyan());
    println!("  {}", style(display_relative(&down, root)).cyan());
    Ok(())
}

/// Builds a migrator from the configured migrations directory.
pub fn load_migrator(config: &Config, root: &Path) -> anyhow::Result<Migrator> {
    let dir = config.migrations_dir(root);
    let mut migrator = Migrator::new();
    for migration in sql_files::load_dir(&dir)? {
        migrator.add(migration)?;
    }
    tracing::debug!("Loaded {} migrations from {}", migrator.len(), dir.display());
    Ok(migrator)
}

/// Opens the configured database, creating its parent directory.
pub fn open_database(config: &Config, root: &Path) -> anyhow::Result<Connection> {
    config.require_driver()?;

    let path = config.database_path(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }
    Connection::open(&path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
