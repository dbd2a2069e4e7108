//! Date standardization for columns whose name mentions "date".
//!
//! Parsing is permissive: a value is tried against RFC 3339/2822, ISO
//! date-times, and a list of common date layouts. Ambiguous slash dates read
//! month-first (`01/06/2023` is January 6th) and fall back to day-first when
//! the first field cannot be a month (`25/12/2023`).

use super::text::as_text;
use super::types::Table;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// ISO-8601 calendar date layout written by the standardizer.
pub const ISO_DATE: &str = "%Y-%m-%d";

// Layouts led by a four-digit year. Only tried when the value starts with
// one, since %Y also reads `1/6/23` as year 1.
const YEAR_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const YEAR_FIRST_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &[
    // Two-digit years first: %Y also accepts two digits and would read 23 as year 0023
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%A, %B %d, %Y",
    "%a, %b %d, %Y",
];

/// Outcome of parsing one raw value as a calendar date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateParse {
    Parsed(NaiveDate),
    Unparseable,
}

impl DateParse {
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Parsed(d) => Some(d),
            Self::Unparseable => None,
        }
    }
}

/// Parses `raw` into a calendar date, discarding any time of day.
pub fn parse_date(raw: &str) -> DateParse {
    let s = raw.trim();
    if s.is_empty() {
        return DateParse::Unparseable;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return DateParse::Parsed(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return DateParse::Parsed(dt.date_naive());
    }
    for fmt in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return DateParse::Parsed(dt.date_naive());
        }
    }

    let year_first = starts_with_year(s);
    let (datetime_formats, date_formats) = if year_first {
        (YEAR_FIRST_DATETIME_FORMATS, YEAR_FIRST_DATE_FORMATS)
    } else {
        (DATETIME_FORMATS, DATE_FORMATS)
    };
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return DateParse::Parsed(dt.date());
        }
    }
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return DateParse::Parsed(d);
        }
    }

    // Compact YYYYMMDD, only for exactly eight digits
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return DateParse::Parsed(d);
        }
    }

    DateParse::Unparseable
}

/// Four digits followed by a separator.
fn starts_with_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 4
        && bytes.iter().take(4).all(u8::is_ascii_digit)
        && bytes.get(4).is_some_and(|b| !b.is_ascii_digit())
}

/// Replaces every value of `column` with its ISO calendar date, or with a
/// missing value when it cannot be read as a date.
///
/// Temporal columns are reduced to their date directly; zoned timestamps
/// take the calendar date in their own time zone. Anything else is read as
/// text and parsed with [`parse_date`].
pub fn standardize_dates(table: Table, column: &str) -> Result<Table> {
    let series = table.df.column(column)?.as_materialized_series().clone();

    let standardized = match series.dtype() {
        DataType::Date => col(column).dt().to_string(ISO_DATE),
        DataType::Datetime(_, _) => col(column).dt().date().dt().to_string(ISO_DATE),
        _ => {
            let text = as_text(&series);
            let mut failed = 0usize;
            let values: StringChunked = text
                .str()?
                .into_iter()
                .map(|raw| {
                    let raw = raw?;
                    let parsed = parse_date(raw).date();
                    if parsed.is_none() {
                        failed += 1;
                    }
                    parsed.map(|d| d.format(ISO_DATE).to_string())
                })
                .collect();
            if failed > 0 {
                tracing::warn!("Column '{column}': {failed} values could not be parsed as dates");
            }

            let mut df = table.df.clone();
            df.replace(column, values.with_name(column.into()).into_series())?;
            return Ok(table.with_df(df));
        }
    };

    let df = table
        .df
        .clone()
        .lazy()
        .with_column(standardized.alias(column))
        .collect()?;
    Ok(table.with_df(df))
}
