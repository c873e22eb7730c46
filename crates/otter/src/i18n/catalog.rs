// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Translation catalog built from nested JSON.
//!
//! Each locale is loaded from a JSON object whose nested keys are joined
//! with `.`:
//!
//! ```json
//! { "nav": { "home": "Home", "about": "About us" } }
//! ```
//!
//! becomes the keys `nav.home` and `nav.about`. Every leaf must be a string.

use std::collections::HashMap;
use std::io::Read;

use serde_json::{Map, Value};
use tracing::debug;

use super::interpolate::{interpolate, EscapeMode, Interpolation, Replacements};
use super::{json_kind, I18nError, Result};

/// Flattens a nested JSON object into dotted keys.
///
/// # Errors
///
/// Fails with [`I18nError::InvalidTranslation`] if any leaf is not a string
/// or object, and with [`I18nError::NotAnObject`] if `value` is not an object.
pub fn flatten_json(value: &Value) -> Result<HashMap<String, String>> {
    let object = value
        .as_object()
        .ok_or(I18nError::NotAnObject(json_kind(value)))?;
    let mut flat = HashMap::new();
    flatten_into(&mut flat, "", object)?;
    Ok(flat)
}

fn flatten_into(flat: &mut HashMap<String, String>, prefix: &str, object: &Map<String, Value>) -> Result<()> {
    for (key, value) in object {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Object(nested) => flatten_into(flat, &full_key, nested)?,
            Value::String(s) => {
                flat.insert(full_key, s.clone());
            }
            other => {
                return Err(I18nError::InvalidTranslation {
                    key: full_key,
                    kind: json_kind(other),
                })
            }
        }
    }
    Ok(())
}

/// Per-locale translation tables.
///
/// Populate the catalog at startup, then share it read-only (`&Catalog` or
/// `Arc<Catalog>`) with request handlers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    translations: HashMap<String, HashMap<String, String>>,
    supported: Vec<String>,
    default_locale: Option<String>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the JSON translations for `locale` from `reader`.
    ///
    /// Loading the same locale again merges keys, later values winning.
    /// The first locale added becomes the default unless
    /// [`set_default_locale`](Self::set_default_locale) was called.
    pub fn add_locale<R: Read>(&mut self, locale: impl Into<String>, reader: R) -> Result<&mut Self> {
        let value: Value = serde_json::from_reader(reader)?;
        self.insert_locale(locale.into(), &value)
    }

    /// Loads the JSON translations for `locale` from a string.
    pub fn add_locale_str(&mut self, locale: impl Into<String>, json: &str) -> Result<&mut Self> {
        let value: Value = serde_json::from_str(json)?;
        self.insert_locale(locale.into(), &value)
    }

    fn insert_locale(&mut self, locale: String, value: &Value) -> Result<&mut Self> {
        let flat = flatten_json(value)?;
        debug!(locale = %locale, keys = flat.len(), "Loaded translations");

        if !self.supported.contains(&locale) {
            self.supported.push(locale.clone());
        }
        if self.default_locale.is_none() {
            self.default_locale = Some(locale.clone());
        }
        self.translations.entry(locale).or_default().extend(flat);
        Ok(self)
    }

    /// Overrides the default locale.
    pub fn set_default_locale(&mut self, locale: impl Into<String>) -> &mut Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// The locale used when nothing better is known.
    pub fn default_locale(&self) -> Result<&str> {
        self.default_locale.as_deref().ok_or(I18nError::NoLocales)
    }

    /// Locales in registration order.
    pub fn supported_locales(&self) -> &[String] {
        &self.supported
    }

    /// Returns `true` if `locale` has been loaded.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.supported.iter().any(|l| l == locale)
    }

    /// Returns the raw template for `key`, or `key` itself when the locale
    /// or key is unknown or the stored value is empty.
    pub fn translation<'a>(&'a self, locale: &str, key: &'a str) -> &'a str {
        self.translations
            .get(locale)
            .and_then(|table| table.get(key))
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(key)
    }

    /// Translates `key` and interpolates `maps`, HTML-escaping text.
    pub fn t(&self, locale: &str, key: &str, maps: &[Replacements]) -> Result<Interpolation> {
        interpolate(key, self.translation(locale, key), EscapeMode::Escaped, maps)
    }

    /// Translates `key` and interpolates `maps` without escaping text.
    pub fn raw_t(&self, locale: &str, key: &str, maps: &[Replacements]) -> Result<Interpolation> {
        interpolate(key, self.translation(locale, key), EscapeMode::Raw, maps)
    }
}
