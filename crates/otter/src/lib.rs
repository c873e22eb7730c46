// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # OTTER
//!
//! Toolkit pieces for server-rendered web applications.
//!
//! ## Features
//!
//! - Translation catalogs flattened from nested JSON, with `{variable}`
//!   interpolation that keeps pre-rendered markup unescaped
//! - Locale negotiation from a cookie or `Accept-Language`
//! - Locale-aware date formatting
//! - A linear SQL migration runner with a validated ledger
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use otter::i18n::{Catalog, Replacements};
//! use otter::migrate::Migrator;
//!
//! let mut catalog = Catalog::new();
//! catalog.add_locale_str("en", r#"{ "home": { "greeting": "Hello {name}" } }"#)?;
//! let html = catalog.t("en", "home.greeting", &[Replacements::new().with("name", "Ann")])?;
//! assert_eq!(html.to_string(), "Hello Ann");
//!
//! let mut migrator = Migrator::new();
//! migrator.add_migration(
//!     "20240101000000_create_users",
//!     |tx| tx.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY)"),
//!     |tx| tx.execute_batch("DROP TABLE users"),
//! )?;
//! migrator.run_all(&mut conn)?;
//! ```

/// Typed environment variable access.
pub mod env;
/// Error types shared across the toolkit.
pub mod error;
/// Translation catalogs, interpolation and date formatting.
pub mod i18n;
/// Linear SQL migrations with a persisted ledger.
pub mod migrate;

pub use error::{Error, Result};
pub use i18n::{Catalog, EscapeMode, Interpolation, Markup, Replacement, Replacements};
pub use migrate::{Migration, Migrator};
