// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by the models and validation logic.

pub mod datetime;
pub mod json;
pub mod slug;

/// Parse an ISO 8601 date or timestamp into UTC.
pub use datetime::{format_datetime, parse_datetime};
/// Describe the JSON type of a value for error messages.
pub use json::type_name;
/// Turn free text or a variant value into a URL-safe slug.
pub use slug::{slug_for_value, slugify};
