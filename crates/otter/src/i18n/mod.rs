// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Internationalization.
//!
//! A [`Catalog`] holds one flattened translation table per locale. Templates
//! may contain `{name}` placeholders that are filled from [`Replacements`]
//! at render time:
//!
//! ```rust,ignore
//! let mut catalog = Catalog::new();
//! catalog.add_locale_str("en", r#"{ "inbox": { "summary": "Hello {name}, you have {count} messages" } }"#)?;
//!
//! let out = catalog.t("en", "inbox.summary", &[Replacements::new().with("name", "Ann").with("count", 3)])?;
//! assert_eq!(out.to_string(), "Hello Ann, you have 3 messages");
//! ```
//!
//! Interpolation produces a stream of [`Chunk`]s rather than a string so a
//! replacement can carry pre-rendered [`Markup`] that must not be escaped.

mod catalog;
mod interpolate;
mod markup;
mod negotiate;
mod time;

pub use catalog::{flatten_json, Catalog};
pub use interpolate::{interpolate, Chunk, EscapeMode, Interpolation, Replacement, Replacements};
pub use markup::{escape_html, Markup};
pub use negotiate::{parse_accept_language, LOCALE_COOKIE};
pub use time::{format_date, DateStyle};

use thiserror::Error;

/// Error type for translation loading, interpolation and formatting.
#[derive(Error, Debug)]
pub enum I18nError {
    /// The translation source is not valid JSON.
    #[error("invalid translation JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The translation source could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON object was expected at the root.
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// A leaf value is neither a string nor an object.
    #[error("invalid translation {key} of type {kind}")]
    InvalidTranslation {
        /// Flattened key of the offending value.
        key: String,
        /// JSON type of the offending value.
        kind: &'static str,
    },

    /// More than one replacement map was supplied.
    #[error("invalid translation \"{key}\" call: more than one replacements map provided")]
    TooManyReplacementMaps {
        /// Translation key.
        key: String,
    },

    /// A `{` appeared while a placeholder was already open.
    #[error("invalid translation \"{key}\" format: opening variable before closing previous")]
    OpeningBeforeClosing {
        /// Translation key.
        key: String,
    },

    /// A `}` appeared without an open placeholder.
    #[error("invalid translation \"{key}\" format: closing variable before opening one")]
    ClosingBeforeOpening {
        /// Translation key.
        key: String,
    },

    /// A `{}` with nothing between the braces.
    #[error("invalid translation \"{key}\" format: missing variable name between {{}}")]
    MissingVariableName {
        /// Translation key.
        key: String,
    },

    /// A placeholder has no entry in the replacement map.
    #[error("invalid translation \"{key}\" call: missing variable \"{name}\" value")]
    MissingVariableValue {
        /// Translation key.
        key: String,
        /// Placeholder name.
        name: String,
    },

    /// A replacement value cannot be rendered.
    #[error("variable \"{name}\" of type {kind} not supported")]
    UnsupportedType {
        /// Placeholder name.
        name: String,
        /// Type of the rejected value.
        kind: &'static str,
    },

    /// No date layout is known for the locale.
    #[error("unsupported locale `{0}`")]
    UnsupportedLocale(String),

    /// The catalog has no registered locales.
    #[error("no locales registered, add one with Catalog::add_locale before use")]
    NoLocales,
}

/// Convenience type alias for Results with [`I18nError`].
pub type Result<T> = std::result::Result<T, I18nError>;

/// Short JSON type name for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
