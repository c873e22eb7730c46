// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! OTTER CLI library.
//!
//! This crate provides the command-line interface for the otter toolkit.
//!
//! # Usage
//!
//! This crate is primarily used through the `otter` binary:
//!
//! ```bash
//! otter migrate new create users table   # Scaffold a migration
//! otter migrate up                       # Apply pending migrations
//! otter migrate status                   # Check the ledger
//! ```
//!
//! # Configuration
//!
//! Projects are configured via `otter.toml` at the project root.

/// CLI command implementations.
pub mod commands;
/// Project configuration from `otter.toml`.
pub mod config;
