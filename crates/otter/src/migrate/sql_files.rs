// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Migrations stored as SQL files.
//!
//! A migrations directory holds one pair of files per migration:
//!
//! ```text
//! migrations/
//! ├── 20240101120000_create_users.up.sql
//! ├── 20240101120000_create_users.down.sql
//! └── 20240203090000_add_user_email.up.sql
//! ```
//!
//! The file stem before `.up.sql` / `.down.sql` is the migration id. A
//! missing down file makes `down` a no-op.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::Transaction;
use tracing::debug;

use super::registry::Migration;
use super::{MigrateError, Result};

const UP_SUFFIX: &str = ".up.sql";
const DOWN_SUFFIX: &str = ".down.sql";
const PLACEHOLDER_SQL: &str = "SELECT 1;\n";

#[derive(Default)]
struct Pair {
    up: Option<String>,
    down: Option<String>,
}

/// Loads every SQL migration in `dir`, sorted by id.
///
/// A missing directory yields no migrations. Files without an
/// `.up.sql` / `.down.sql` suffix are ignored.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Vec<Migration>> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Migrations directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut pairs: BTreeMap<String, Pair> = BTreeMap::new();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if let Some(id) = name.strip_suffix(UP_SUFFIX) {
            pairs.entry(id.to_string()).or_default().up = Some(fs::read_to_string(&path)?);
        } else if let Some(id) = name.strip_suffix(DOWN_SUFFIX) {
            pairs.entry(id.to_string()).or_default().down = Some(fs::read_to_string(&path)?);
        } else {
            debug!("Skipping non-migration file {}", path.display());
        }
    }

    pairs
        .into_iter()
        .map(|(id, pair)| -> Result<Migration> {
            let up = pair.up.ok_or_else(|| MigrateError::MissingUpFile { id: id.clone() })?;
            let down = pair.down.unwrap_or_default();
            Ok(Migration::new(
                id,
                move |tx: &Transaction<'_>| tx.execute_batch(&up),
                move |tx: &Transaction<'_>| tx.execute_batch(&down),
            ))
        })
        .collect()
}

/// Creates an empty up/down pair for a new migration in `dir`.
///
/// The id is `now` formatted as `YYYYMMDDHHMMSS` followed by the snake-cased
/// description. Returns the paths of the up and down files.
pub fn new_migration_files(dir: impl AsRef<Path>, description: &str, now: NaiveDateTime) -> Result<(PathBuf, PathBuf)> {
    let slug = to_snake_case(description);
    if slug.is_empty() {
        return Err(MigrateError::InvalidDescription(description.to_string()));
    }

    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let id = format!("{}_{}", now.format("%Y%m%d%H%M%S"), slug);
    let up = dir.join(format!("{}{}", id, UP_SUFFIX));
    let down = dir.join(format!("{}{}", id, DOWN_SUFFIX));
    create_new(&up)?;
    create_new(&down)?;
    Ok((up, down))
}

fn create_new(path: &Path) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(MigrateError::FileExists(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(PLACEHOLDER_SQL.as_bytes())?;
    Ok(())
}

/// Converts a free-form description to `snake_case`.
///
/// Uppercase letters following a lowercase letter or digit start a new
/// word; whitespace, `-`, `.` and `,` become a single `_`.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else if c.is_whitespace() || matches!(c, '-' | '.' | ',') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    while out.ends_with('_') {
        out.pop();
    }
    out
}
