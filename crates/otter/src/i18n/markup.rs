// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Trusted markup and HTML escaping.

use std::fmt;

/// A pre-rendered HTML fragment.
///
/// Markup is written verbatim by [`Interpolation`](super::Interpolation)
/// regardless of escape mode, so only wrap content that is already safe.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    /// Wraps already-rendered HTML.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Returns the raw HTML.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the fragment, returning the raw HTML.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writes `text` to `out` with `& < > " '` replaced by HTML entities.
pub fn escape_html<W: fmt::Write + ?Sized>(out: &mut W, text: &str) -> fmt::Result {
    let mut last = 0;
    for (i, c) in text.char_indices() {
        let entity = match c {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            '"' => "&#34;",
            '\'' => "&#39;",
            _ => continue,
        };
        out.write_str(&text[last..i])?;
        out.write_str(entity)?;
        last = i + 1;
    }
    out.write_str(&text[last..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(text: &str) -> String {
        let mut out = String::new();
        escape_html(&mut out, text).unwrap();
        out
    }

    #[test]
    fn test_escapes_special_characters() {
        assert_eq!(
            escaped(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&#34;x&#34;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_leaves_plain_and_multibyte_text_alone() {
        assert_eq!(escaped("héllo wörld ✓"), "héllo wörld ✓");
        assert_eq!(escaped(""), "");
    }
}
