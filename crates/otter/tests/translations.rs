// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for catalogs loaded from translation files.

use std::fs::{self, File};

use otter::i18n::{Catalog, Chunk, I18nError, Markup, Replacements};
use tempfile::TempDir;

fn catalog_from_files() -> (TempDir, Catalog) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("en.json"),
        r#"{
            "inbox": {
                "summary": "Hello {name}, you have {count} messages",
                "empty": "No messages"
            },
            "legal": { "accept": "I accept the {terms}" },
            "pricing": { "literal": "price: \\{5\\}" }
        }"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("es.json"),
        r#"{ "inbox": { "summary": "Hola {name}, tienes {count} mensajes" } }"#,
    )
    .unwrap();

    let mut catalog = Catalog::new();
    for locale in ["en", "es"] {
        let file = File::open(temp_dir.path().join(format!("{locale}.json"))).unwrap();
        catalog.add_locale(locale, file).unwrap();
    }
    (temp_dir, catalog)
}

#[test]
fn test_substitution_per_locale() {
    let (_temp_dir, catalog) = catalog_from_files();
    let maps = [Replacements::new().with("name", "Ann").with("count", 3)];

    assert_eq!(
        catalog.t("en", "inbox.summary", &maps).unwrap().to_string(),
        "Hello Ann, you have 3 messages"
    );
    assert_eq!(
        catalog.t("es", "inbox.summary", &maps).unwrap().to_string(),
        "Hola Ann, tienes 3 mensajes"
    );
}

#[test]
fn test_missing_translation_echoes_key() {
    let (_temp_dir, catalog) = catalog_from_files();
    let maps = [Replacements::new()];
    assert_eq!(
        catalog.t("es", "inbox.empty", &maps).unwrap().to_string(),
        "inbox.empty"
    );
}

#[test]
fn test_escaped_braces_from_file() {
    let (_temp_dir, catalog) = catalog_from_files();
    let out = catalog
        .t("en", "pricing.literal", &[Replacements::new()])
        .unwrap();
    assert_eq!(out.to_string(), r"price: \{5\}");
}

#[test]
fn test_fragment_passes_through() {
    let (_temp_dir, catalog) = catalog_from_files();
    let link = Markup::new(r#"<a href="/terms">terms</a>"#);
    let out = catalog
        .t("en", "legal.accept", &[Replacements::new().with("terms", link.clone())])
        .unwrap();

    assert_eq!(
        out.chunks(),
        &[Chunk::Text("I accept the ".to_string()), Chunk::Fragment(link)]
    );
    assert_eq!(out.to_string(), r#"I accept the <a href="/terms">terms</a>"#);
}

#[test]
fn test_missing_variable_is_one_error() {
    let (_temp_dir, catalog) = catalog_from_files();
    let err = catalog
        .t("en", "inbox.summary", &[Replacements::new().with("name", "Ann")])
        .unwrap_err();
    assert!(matches!(
        err,
        I18nError::MissingVariableValue { ref key, ref name } if key == "inbox.summary" && name == "count"
    ));
}

#[test]
fn test_bad_file_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fr.json");
    fs::write(&path, r#"{ "inbox": { "count": 3 } }"#).unwrap();

    let mut catalog = Catalog::new();
    let err = catalog.add_locale("fr", File::open(&path).unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "invalid translation inbox.count of type number");
    assert!(catalog.supported_locales().is_empty());
}
