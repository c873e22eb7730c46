// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! OTTER project configuration.
//!
//! Configuration is loaded from `otter.toml` at the project root.
//!
//! # Example Configuration
//!
//! ```toml
//! [project]
//! name = "my-app"
//!
//! [database]
//! driver = "sqlite"
//! path = ".otter/data/app.db"
//!
//! [migrate]
//! migrations_dir = "migrations"
//! ```
//!
//! The `OTTER_DATABASE_PATH` environment variable overrides `database.path`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the project configuration.
pub const CONFIG_FILE: &str = "otter.toml";

/// Environment variable overriding the database path.
pub const DATABASE_PATH_ENV: &str = "OTTER_DATABASE_PATH";

/// Database drivers the CLI can connect to.
pub const SUPPORTED_DRIVERS: &[&str] = &["sqlite"];

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse otter.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// The migrations directory is absolute.
    #[error("migrations directory must be relative to the root project, can't start with `/`")]
    AbsoluteMigrationsDir,

    /// The database driver is not supported.
    #[error("unsupported driver `{0}`, supported drivers are [sqlite]")]
    UnsupportedDriver(String),

    /// A command needs a database but no driver is configured.
    #[error("No db driver set, make sure you have one set on your otter.toml")]
    MissingDriver,
}

/// Main configuration structure loaded from `otter.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Migration settings.
    #[serde(default)]
    pub migrate: MigrateConfig,
}

/// Project metadata configuration.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_name")]
    pub name: String,
}

/// Database configuration.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver; only `sqlite` is supported.
    #[serde(default)]
    pub driver: Option<String>,
    /// Database file, relative to the project root unless absolute
    /// (default: ".otter/data/app.db").
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Migration configuration.
#[derive(Debug, Deserialize)]
pub struct MigrateConfig {
    /// Directory holding `.up.sql` / `.down.sql` files (default: "migrations").
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

fn default_name() -> String {
    "unnamed".to_string()
}

fn default_database_path() -> String {
    ".otter/data/app.db".to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { name: default_name() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: None,
            path: default_database_path(),
        }
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from `otter.toml` in `root`.
    ///
    /// If no configuration file exists, returns default configuration.
    /// Environment overrides are applied after parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed
    /// or fails validation.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
                path: config_path.clone(),
                source,
            })?;
            Self::parse(&content)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            Self::default()
        };

        if let Ok(path) = otter::env::required_string(DATABASE_PATH_ENV) {
            config.database.path = path;
        }
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        let dir = &mut self.migrate.migrations_dir;
        if dir.is_empty() {
            *dir = default_migrations_dir();
        }
        if dir.starts_with('/') {
            return Err(ConfigError::AbsoluteMigrationsDir);
        }
        let trimmed = dir.trim_start_matches("./").trim_end_matches('/').to_string();
        *dir = if trimmed.is_empty() { ".".to_string() } else { trimmed };

        if let Some(driver) = &self.database.driver {
            if !SUPPORTED_DRIVERS.contains(&driver.as_str()) {
                return Err(ConfigError::UnsupportedDriver(driver.clone()));
            }
        }
        Ok(())
    }

    /// Returns the configured driver, failing if none is set.
    pub fn require_driver(&self) -> Result<&str, ConfigError> {
        self.database.driver.as_deref().ok_or(ConfigError::MissingDriver)
    }

    /// Absolute migrations directory under `root`.
    pub fn migrations_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.migrate.migrations_dir)
    }

    /// Database file path, resolved against `root` when relative.
    pub fn database_path(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.database.path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}
