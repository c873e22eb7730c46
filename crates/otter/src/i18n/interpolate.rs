// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! `{variable}` interpolation for translation templates.
//!
//! # Syntax
//!
//! - `{name}` is replaced by the value of `name` in the replacement map
//! - `\{` and `\}` are literal braces; the backslash is kept in the output
//! - everything else is literal text
//! - a `{` left open at the end of the template is dropped together with
//!   the partial name after it
//!
//! A template is scanned one `char` at a time, so multi-byte text passes
//! through untouched. Any syntax or lookup problem fails the whole call;
//! there is no partial output.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use super::markup::{escape_html, Markup};
use super::{json_kind, I18nError, Result};

/// How literal text chunks are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// Write text as-is.
    Raw,
    /// HTML-escape text.
    #[default]
    Escaped,
}

/// A value that can fill a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Pre-rendered markup, inserted without escaping.
    Fragment(Markup),
    /// An integer of any primitive width, formatted in decimal.
    Integer(i128),
    /// Plain text, escaped like the surrounding template.
    Text(String),
}

impl From<Markup> for Replacement {
    fn from(markup: Markup) -> Self {
        Replacement::Fragment(markup)
    }
}

impl From<String> for Replacement {
    fn from(text: String) -> Self {
        Replacement::Text(text)
    }
}

impl From<&str> for Replacement {
    fn from(text: &str) -> Self {
        Replacement::Text(text.to_string())
    }
}

impl From<char> for Replacement {
    fn from(c: char) -> Self {
        Replacement::Text(c.to_string())
    }
}

macro_rules! integer_replacement {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Replacement {
                fn from(n: $ty) -> Self {
                    Replacement::Integer(n as i128)
                }
            }
        )*
    };
}

integer_replacement!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Placeholder name to value mapping for one interpolation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements(HashMap<String, Replacement>);

impl Replacements {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Replacement>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Replacement>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a value by placeholder name.
    pub fn get(&self, name: &str) -> Option<&Replacement> {
        self.0.get(name)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds replacements from a JSON object such as a template context.
    ///
    /// Strings become text and integers become numbers. Floats, booleans,
    /// nulls, arrays and nested objects are rejected with
    /// [`I18nError::UnsupportedType`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or(I18nError::NotAnObject(json_kind(value)))?;

        let mut replacements = Self::new();
        for (name, value) in object {
            let integer = value
                .as_i64()
                .map(i128::from)
                .or_else(|| value.as_u64().map(i128::from));
            let replacement = match (value, integer) {
                (Value::String(s), _) => Replacement::Text(s.clone()),
                (Value::Number(_), Some(i)) => Replacement::Integer(i),
                (other, _) => {
                    return Err(I18nError::UnsupportedType {
                        name: name.clone(),
                        kind: json_kind(other),
                    })
                }
            };
            replacements.insert(name.clone(), replacement);
        }
        Ok(replacements)
    }
}

impl<K: Into<String>, V: Into<Replacement>> FromIterator<(K, V)> for Replacements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One unit of interpolation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Literal text, subject to the escape mode.
    Text(String),
    /// Pre-rendered markup, always written verbatim.
    Fragment(Markup),
}

/// The result of interpolating a template.
///
/// Rendering writes every chunk in order, escaping text chunks when the
/// mode is [`EscapeMode::Escaped`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpolation {
    chunks: Vec<Chunk>,
    mode: EscapeMode,
}

impl Interpolation {
    /// A single literal chunk.
    pub fn literal(text: impl Into<String>, mode: EscapeMode) -> Self {
        Self {
            chunks: vec![Chunk::Text(text.into())],
            mode,
        }
    }

    /// The chunks in output order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// The escape mode applied to text chunks.
    pub fn mode(&self) -> EscapeMode {
        self.mode
    }

    /// Consumes the interpolation, returning its chunks.
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Writes the rendered output to `out`.
    pub fn render_to<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        for chunk in &self.chunks {
            match (chunk, self.mode) {
                (Chunk::Text(text), EscapeMode::Escaped) => escape_html(out, text)?,
                (Chunk::Text(text), EscapeMode::Raw) => out.write_str(text)?,
                (Chunk::Fragment(markup), _) => out.write_str(markup.as_str())?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_to(f)
    }
}

/// Interpolates `template`, the translation stored under `key`.
///
/// `maps` holds zero or one replacement map. With no map, or when the
/// template is the key itself (the translation is missing), the template
/// is returned as one literal chunk without looking at placeholders.
///
/// # Errors
///
/// Returns an [`I18nError`] naming `key` when more than one map is given,
/// the placeholder syntax is malformed, or a placeholder has no value.
pub fn interpolate(
    key: &str,
    template: &str,
    mode: EscapeMode,
    maps: &[Replacements],
) -> Result<Interpolation> {
    let replacements = match maps {
        [] => return Ok(Interpolation::literal(template, mode)),
        [_, _, ..] => {
            return Err(I18nError::TooManyReplacementMaps {
                key: key.to_string(),
            })
        }
        [replacements] => replacements,
    };
    if template == key {
        return Ok(Interpolation::literal(template, mode));
    }

    let mut chunks = Vec::new();
    let mut text = String::new();
    let mut name = String::new();
    let mut collecting = false;
    let mut prev = None;

    for c in template.chars() {
        let escaped = prev == Some('\\');
        prev = Some(c);

        match c {
            '{' if !escaped => {
                if collecting {
                    return Err(I18nError::OpeningBeforeClosing {
                        key: key.to_string(),
                    });
                }
                if !text.is_empty() {
                    chunks.push(Chunk::Text(std::mem::take(&mut text)));
                }
                collecting = true;
            }
            '}' if !escaped => {
                if !collecting {
                    return Err(I18nError::ClosingBeforeOpening {
                        key: key.to_string(),
                    });
                }
                if name.is_empty() {
                    return Err(I18nError::MissingVariableName {
                        key: key.to_string(),
                    });
                }
                let value = replacements.get(&name).ok_or_else(|| {
                    I18nError::MissingVariableValue {
                        key: key.to_string(),
                        name: name.clone(),
                    }
                })?;
                chunks.push(match value {
                    Replacement::Fragment(markup) => Chunk::Fragment(markup.clone()),
                    Replacement::Integer(n) => Chunk::Text(n.to_string()),
                    Replacement::Text(s) => Chunk::Text(s.clone()),
                });
                name.clear();
                collecting = false;
            }
            _ if collecting => name.push(c),
            _ => text.push(c),
        }
    }

    if collecting {
        debug!(key, partial = %name, "Dropping unclosed placeholder");
    }
    if !text.is_empty() {
        chunks.push(Chunk::Text(text));
    }

    Ok(Interpolation { chunks, mode })
}
