// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Picking a request locale from a cookie or `Accept-Language`.

use super::catalog::Catalog;
use super::Result;

/// Name of the cookie that stores an explicit locale choice.
pub const LOCALE_COOKIE: &str = "otter-lang";

/// Splits an `Accept-Language` header into language tags, in header order.
///
/// Quality parameters are dropped; the header order is taken as the
/// preference order.
pub fn parse_accept_language(header: &str) -> Vec<&str> {
    header
        .split(',')
        .map(|part| part.split(';').next().unwrap_or(part).trim())
        .filter(|tag| !tag.is_empty())
        .collect()
}

impl Catalog {
    /// Chooses the locale for a request.
    ///
    /// A supported locale in the cookie wins. Otherwise the first supported
    /// `Accept-Language` tag is used, matching `en-US` to `en` when only the
    /// primary language is loaded. A `*` in either place, or no match at
    /// all, selects the default locale.
    pub fn negotiate_locale(&self, cookie: Option<&str>, accept_language: Option<&str>) -> Result<&str> {
        let default = self.default_locale()?;

        if let Some(cookie) = cookie.map(str::trim).filter(|c| !c.is_empty()) {
            if cookie == "*" {
                return Ok(default);
            }
            if let Some(locale) = self.match_supported(cookie) {
                return Ok(locale);
            }
        }

        for tag in accept_language.map(parse_accept_language).unwrap_or_default() {
            if tag == "*" {
                return Ok(default);
            }
            if let Some(locale) = self.match_supported(tag) {
                return Ok(locale);
            }
        }

        Ok(default)
    }

    fn match_supported(&self, tag: &str) -> Option<&str> {
        let exact = self
            .supported_locales()
            .iter()
            .find(|l| l.eq_ignore_ascii_case(tag));
        let primary = || {
            let language = tag.split(['-', '_']).next()?;
            self.supported_locales()
                .iter()
                .find(|l| l.eq_ignore_ascii_case(language))
        };
        exact.or_else(primary).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18nError;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_locale_str("en", "{}").unwrap();
        catalog.add_locale_str("es", "{}").unwrap();
        catalog.add_locale_str("pt-BR", "{}").unwrap();
        catalog
    }

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(
            parse_accept_language("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5"),
            vec!["fr-CH", "fr", "en", "*"]
        );
        assert!(parse_accept_language("").is_empty());
    }

    #[test]
    fn test_cookie_wins() {
        let catalog = catalog();
        assert_eq!(catalog.negotiate_locale(Some("es"), Some("en")).unwrap(), "es");
        assert_eq!(catalog.negotiate_locale(Some("*"), Some("es")).unwrap(), "en");
    }

    #[test]
    fn test_unsupported_cookie_falls_through_to_header() {
        let catalog = catalog();
        assert_eq!(catalog.negotiate_locale(Some("de"), Some("es")).unwrap(), "es");
    }

    #[test]
    fn test_header_order_and_subtags() {
        let catalog = catalog();
        assert_eq!(
            catalog.negotiate_locale(None, Some("de-DE,es-MX;q=0.9,en;q=0.8")).unwrap(),
            "es"
        );
        assert_eq!(catalog.negotiate_locale(None, Some("pt-br")).unwrap(), "pt-BR");
        assert_eq!(catalog.negotiate_locale(None, Some("de, *")).unwrap(), "en");
        assert_eq!(catalog.negotiate_locale(None, Some("de")).unwrap(), "en");
        assert_eq!(catalog.negotiate_locale(None, None).unwrap(), "en");
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new();
        assert!(matches!(
            catalog.negotiate_locale(None, Some("en")),
            Err(I18nError::NoLocales)
        ));
    }
}
