//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing logic and the timestamp rules:
//! writes always use [`format_timestamp`]; reads accept the legacy formats
//! that older imports left behind.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::DatabaseError;

/// Canonical storage form: RFC 3339, millisecond precision, `Z` suffix.
///
/// Fixed width, so lexical order on the TEXT column equals time order.
#[must_use]
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Whether a stored value is already in canonical form.
#[must_use]
pub fn is_canonical_timestamp(s: &str) -> bool {
    s.len() == 24 && s.ends_with('Z') && DateTime::parse_from_rfc3339(s).is_ok()
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Accepts RFC 3339 with any offset, naive ISO 8601 with or without
/// fractional seconds (read as UTC), `SQLite`'s `datetime('now')` format, and a
/// bare date (midnight UTC).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string matches none of the formats.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DatabaseError::Query(format!("Failed to parse datetime '{s}'")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read an INTEGER column holding a 0/1 flag.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_flag(row: &libsql::Row, idx: i32) -> Result<bool, DatabaseError> {
    Ok(row.get::<i64>(idx)? != 0)
}

/// Read a `COUNT(*)` column. Negative values cannot come out of SQLite, but
/// the conversion is checked rather than cast.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let n = row.get::<i64>(idx)?;
    u64::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("negative count {n}")))
}

/// Parse a TEXT column holding a JSON document.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the text is not valid JSON for `T`.
pub fn parse_json<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_str(s).map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))
}

/// Placeholder list `?{start}, ?{start+1}, ...` for an `IN (...)` clause.
#[must_use]
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}
