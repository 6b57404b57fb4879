// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! ISO 8601 date parsing and formatting shared by metadata and value checks.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date into UTC.
///
/// Bare dates are interpreted as midnight UTC. Returns `None` for anything
/// else, including out-of-range calendar dates.
pub fn parse_datetime(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts.to_offset(UtcOffset::UTC));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Format a timestamp as RFC 3339 in UTC.
///
/// Formatting only fails for years outside RFC 3339's four-digit range; those
/// fall back to the `Display` form so callers always get a string.
pub fn format_datetime(ts: OffsetDateTime) -> String {
    let utc = ts.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}
