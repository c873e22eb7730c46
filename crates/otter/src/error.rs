// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the toolkit.
//!
//! Each subsystem owns a focused error enum; [`Error`] wraps all of them
//! so a host application can propagate any of them with `?` from its
//! startup sequence.
//!
//! # Error Categories
//!
//! - **Translation errors**: malformed catalogs and interpolation failures
//! - **Migration errors**: ledger divergence and failed applies
//! - **Environment errors**: missing or malformed variables

use thiserror::Error;

use crate::env::EnvError;
use crate::i18n::I18nError;
use crate::migrate::MigrateError;

/// The umbrella error type for otter operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Translation loading or interpolation failed.
    #[error(transparent)]
    I18n(#[from] I18nError),

    /// Migration validation or execution failed.
    #[error(transparent)]
    Migrate(#[from] MigrateError),

    /// A required environment variable was missing or malformed.
    #[error(transparent)]
    Env(#[from] EnvError),
}

/// Convenience type alias for Results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_subsystem_errors_transparently() {
        let err: Error = EnvError::Missing("PORT".to_string()).into();
        assert_eq!(err.to_string(), "missing required env variable `PORT`");

        let err: Error = MigrateError::Pending { remaining: 2 }.into();
        assert!(matches!(err, Error::Migrate(MigrateError::Pending { remaining: 2 })));
    }
}
