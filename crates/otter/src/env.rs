// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Typed access to environment variables.
//!
//! An empty variable is treated the same as an unset one.

use thiserror::Error;

/// Error type for environment lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The variable is unset or empty.
    #[error("missing required env variable `{0}`")]
    Missing(String),

    /// The variable is set but is not an integer.
    #[error("invalid int \"{value}\" for env variable `{key}`")]
    InvalidInt {
        /// Variable name.
        key: String,
        /// The raw value found.
        value: String,
    },
}

fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_int(key: &str, value: String) -> Result<i64, EnvError> {
    value
        .trim()
        .parse()
        .map_err(|_| EnvError::InvalidInt { key: key.to_string(), value })
}

/// Returns the value of `key`, or [`EnvError::Missing`].
pub fn required_string(key: &str) -> Result<String, EnvError> {
    lookup(key).ok_or_else(|| EnvError::Missing(key.to_string()))
}

/// Returns the value of `key`, or `default` when unset.
pub fn optional_string(key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Returns `true` only when `key` is exactly `"true"`; `default` when unset.
pub fn optional_bool(key: &str, default: bool) -> bool {
    lookup(key).map_or(default, |v| v == "true")
}

/// Parses `key` as an integer, falling back to `default` when unset.
pub fn optional_int(key: &str, default: i64) -> Result<i64, EnvError> {
    match lookup(key) {
        Some(value) => parse_int(key, value),
        None => Ok(default),
    }
}

/// Parses `key` as an integer, failing when it is unset.
pub fn required_int(key: &str) -> Result<i64, EnvError> {
    parse_int(key, required_string(key)?)
}
