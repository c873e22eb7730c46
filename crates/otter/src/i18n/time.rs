// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Locale-aware date formatting.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Locale, TimeZone};

use super::{I18nError, Result};

/// Predefined date and time layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateStyle {
    /// Weekday and full date, e.g. `Tuesday, March 5, 2024`.
    Full,
    /// Full date without weekday, e.g. `March 5, 2024`.
    Long,
    /// Abbreviated date, e.g. `Mar 05, 2024`.
    Medium,
    /// Numeric date, e.g. `3/5/24`.
    Short,
    /// Numeric date with time, e.g. `3/5/24 14:07`.
    DateTime,
    /// Time only, e.g. `14:07`.
    Time,
}

impl DateStyle {
    /// Lowercase name of the style.
    pub fn as_str(self) -> &'static str {
        match self {
            DateStyle::Full => "full",
            DateStyle::Long => "long",
            DateStyle::Medium => "medium",
            DateStyle::Short => "short",
            DateStyle::DateTime => "datetime",
            DateStyle::Time => "time",
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "full" => Ok(DateStyle::Full),
            "long" => Ok(DateStyle::Long),
            "medium" => Ok(DateStyle::Medium),
            "short" => Ok(DateStyle::Short),
            "datetime" => Ok(DateStyle::DateTime),
            "time" => Ok(DateStyle::Time),
            other => Err(format!("unknown date style `{}`", other)),
        }
    }
}

/// Layouts indexed by style: full, long, medium, short, datetime, time.
type Layouts = [&'static str; 6];

fn layouts(locale: &str) -> Option<(Locale, Layouts)> {
    let found = match locale {
        "en" => (
            Locale::en_US,
            ["%A, %B %-d, %Y", "%B %-d, %Y", "%b %d, %Y", "%-m/%-d/%y", "%-m/%-d/%y %H:%M", "%H:%M"],
        ),
        "es" => (
            Locale::es_ES,
            ["%A, %-d de %B de %Y", "%-d de %B de %Y", "%d/%m/%Y", "%d/%m/%y", "%d/%m/%y %H:%M", "%H:%M"],
        ),
        "fr" => (
            Locale::fr_FR,
            ["%A %-d %B %Y", "%-d %B %Y", "%d %b %Y", "%d/%m/%Y", "%d/%m/%Y %H:%M", "%H:%M"],
        ),
        "it" => (
            Locale::it_IT,
            ["%A %-d %B %Y", "%-d %B %Y", "%d/%b/%Y", "%d/%m/%y", "%d/%m/%y %H:%M", "%H:%M"],
        ),
        _ => return None,
    };
    Some(found)
}

/// Formats `datetime` for `locale` using one of the predefined styles.
///
/// Supported locales are `en`, `es`, `fr` and `it`.
pub fn format_date<Tz>(locale: &str, datetime: &DateTime<Tz>, style: DateStyle) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let (chrono_locale, layouts) =
        layouts(locale).ok_or_else(|| I18nError::UnsupportedLocale(locale.to_string()))?;
    let layout = match style {
        DateStyle::Full => layouts[0],
        DateStyle::Long => layouts[1],
        DateStyle::Medium => layouts[2],
        DateStyle::Short => layouts[3],
        DateStyle::DateTime => layouts[4],
        DateStyle::Time => layouts[5],
    };
    Ok(datetime.format_localized(layout, chrono_locale).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap()
    }

    #[test]
    fn test_english_styles() {
        let date = sample();
        let cases = [
            (DateStyle::Full, "Tuesday, March 5, 2024"),
            (DateStyle::Long, "March 5, 2024"),
            (DateStyle::Medium, "Mar 05, 2024"),
            (DateStyle::Short, "3/5/24"),
            (DateStyle::DateTime, "3/5/24 14:07"),
            (DateStyle::Time, "14:07"),
        ];
        for (style, expected) in cases {
            assert_eq!(format_date("en", &date, style).unwrap(), expected, "style {style}");
        }
    }

    #[test]
    fn test_localized_names() {
        let date = sample();
        assert_eq!(format_date("es", &date, DateStyle::Long).unwrap(), "5 de marzo de 2024");
        assert_eq!(format_date("fr", &date, DateStyle::Short).unwrap(), "05/03/2024");
        assert!(format_date("it", &date, DateStyle::Long).unwrap().contains("marzo"));
    }

    #[test]
    fn test_unknown_locale() {
        assert!(matches!(
            format_date("de", &sample(), DateStyle::Full),
            Err(I18nError::UnsupportedLocale(l)) if l == "de"
        ));
    }

    #[test]
    fn test_style_names_round_trip() {
        for style in [DateStyle::Full, DateStyle::Time, DateStyle::DateTime] {
            assert_eq!(style.as_str().parse::<DateStyle>().unwrap(), style);
        }
        assert!("weekly".parse::<DateStyle>().is_err());
    }
}
