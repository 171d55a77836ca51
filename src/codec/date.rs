//! ISO-8601 timestamp codec with configurable separator substitution.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{DecodeError, Error};
use crate::types::{DateOptions, RawValue, Value};

fn escape(separator: &str) -> String {
    separator.replace('%', "%%")
}

/// chrono format string for `YYYY-MM-DDTHH:MM:SS.sssZ` with the `-` and `:`
/// replaced by the configured separators.
fn iso_format(options: &DateOptions) -> String {
    let h = escape(&options.hyphen_separator);
    let c = escape(&options.colon_separator);
    format!("%Y{h}%m{h}%dT%H{c}%M{c}%S%.3fZ")
}

/// Format a timestamp at millisecond precision in UTC.
pub fn format_date(date: &DateTime<Utc>, options: &DateOptions) -> String {
    date.format(&iso_format(options)).to_string()
}

/// Parse text produced by [`format_date`] with the same options.
///
/// Only text that formats back to itself is accepted, so shorthand forms
/// (missing milliseconds, offsets other than `Z`) are rejected.
pub fn parse_date(text: &str, options: &DateOptions) -> Result<DateTime<Utc>, DecodeError> {
    let format = iso_format(options);
    let naive = NaiveDateTime::parse_from_str(text, &format)
        .map_err(|_| DecodeError::InvalidDate(text.to_string()))?;
    let date = naive.and_utc();

    if date.format(&format).to_string() != text {
        return Err(DecodeError::InvalidDate(text.to_string()));
    }
    Ok(date)
}

/// Whether `text` is a canonical `YYYY-MM-DDTHH:MM:SS.sssZ` timestamp.
pub fn is_iso_date(text: &str) -> bool {
    parse_date(text, &DateOptions::default()).is_ok()
}

pub fn encode_date(value: &Value, options: &DateOptions) -> Result<String, Error> {
    match value {
        Value::Date(date) => Ok(format_date(date, options)),
        other => Err(Error::UnsupportedValue {
            expected: "date",
            found: other.kind_name(),
        }),
    }
}

pub fn decode_date(raw: &RawValue, options: &DateOptions) -> Result<Value, DecodeError> {
    parse_date(raw.first(), options).map(Value::Date)
}
