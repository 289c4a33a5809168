//! Release-date normalization
//!
//! Release dates arrive from the song-info provider (and from update requests)
//! in several spellings. They are stored in one canonical form,
//! `YYYY-MM-DD HH:MM:SS`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::debug;

/// Canonical storage format
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted input formats, tried in order
///
/// `%B` matches English month names (full or abbreviated, any case).
const INPUT_FORMATS: &[(&str, Precision)] = &[
    ("%Y-%m-%d", Precision::Date),
    ("%d-%m-%Y", Precision::Date),
    ("%d/%m/%Y", Precision::Date),
    ("%Y-%m-%d %H:%M:%S", Precision::DateTime),
    ("%d-%m-%Y %H:%M:%S", Precision::DateTime),
    ("%d/%m/%Y %H:%M:%S", Precision::DateTime),
    ("%B %d, %Y", Precision::Date),
    ("%d.%m.%Y", Precision::Date),
];

#[derive(Debug, Clone, Copy)]
enum Precision {
    Date,
    DateTime,
}

/// None of the accepted formats matched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date format: '{0}'")]
pub struct DateFormatError(pub String);

fn parse_with(input: &str, format: &str, precision: Precision) -> Option<NaiveDateTime> {
    let parsed = match precision {
        Precision::Date => NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0)),
        Precision::DateTime => NaiveDateTime::parse_from_str(input, format).ok(),
    }?;

    // chrono reads a year of 1 to 4 digits; only four-digit years are dates here
    (1000..=9999).contains(&parsed.year()).then_some(parsed)
}

/// Parse `input` with the first matching format and return it in canonical form
///
/// # Examples
/// ```
/// use songlib_api::date_format::normalize_release_date;
///
/// assert_eq!(normalize_release_date("16.07.2006").unwrap(), "2006-07-16 00:00:00");
/// assert!(normalize_release_date("not-a-date").is_err());
/// ```
pub fn normalize_release_date(input: &str) -> Result<String, DateFormatError> {
    let trimmed = input.trim();

    for (format, precision) in INPUT_FORMATS {
        match parse_with(trimmed, format, *precision) {
            Some(parsed) => {
                let formatted = parsed.format(CANONICAL_FORMAT).to_string();
                debug!(
                    input = %input,
                    used_format = %format,
                    formatted = %formatted,
                    "Parsed release date"
                );
                return Ok(formatted);
            }
            None => debug!(input = %input, format = %format, "Release date did not match format"),
        }
    }

    Err(DateFormatError(input.to_string()))
}
