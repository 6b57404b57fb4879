// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Produce URL-safe slugs for product variants.

use serde_json::Value;

/// Fallback used when nothing slug-worthy survives sanitization.
pub const FALLBACK_SLUG: &str = "variant";

/// Produce a lowercase ASCII slug from free text.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Größe" → "Grosse").
/// - Keep ASCII alphanumerics, lowercased; everything else becomes `-`.
/// - Collapse runs of `-` and trim them from both ends.
/// - Fall back to [`FALLBACK_SLUG`] when the result is empty.
pub fn slugify(value: &str) -> String {
    // Step 1: transliterate to ASCII to avoid multi-byte surprises.
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());

    // Step 2: map characters into the allowed set and collapse separator runs.
    for ch in transliterated.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }

    while out.ends_with('-') {
        out.pop();
    }

    if out.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    out
}

/// Derive a slug from a variant value of any attribute type.
///
/// Strings slug directly, colors use their `name`, numbers and booleans use
/// their textual form, and option indices are prefixed with `option-`.
pub fn slug_for_value(value: &Value) -> String {
    match value {
        Value::String(s) => slugify(s),
        Value::Number(n) => slugify(&n.to_string()),
        Value::Bool(b) => slugify(if *b { "yes" } else { "no" }),
        Value::Object(map) => match map.get("name").and_then(Value::as_str) {
            Some(name) => slugify(name),
            None => FALLBACK_SLUG.to_string(),
        },
        Value::Array(items) => {
            let joined = items
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join("-");
            slugify(&format!("option-{joined}"))
        }
        Value::Null => FALLBACK_SLUG.to_string(),
    }
}

/// True when `slug` is already in canonical slug form.
pub fn is_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Accents are transliterated and separators collapse to single dashes.
    #[test]
    fn slugify_transliterates_and_collapses_separators() {
        assert_eq!(slugify("Größe XL / Café"), "grosse-xl-cafe");
        assert_eq!(slugify("  Dark   Blue  "), "dark-blue");
    }

    // Inputs without any alphanumerics fall back to the default slug.
    #[test]
    fn slugify_falls_back_for_symbol_only_input() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    // Variant values of each JSON kind produce a usable slug.
    #[test]
    fn slug_for_value_handles_each_kind() {
        assert_eq!(slug_for_value(&json!("Navy Blue")), "navy-blue");
        assert_eq!(slug_for_value(&json!(42.5)), "42-5");
        assert_eq!(slug_for_value(&json!(true)), "yes");
        assert_eq!(
            slug_for_value(&json!({"name": "Red", "hexCode": "#f00"})),
            "red"
        );
        assert_eq!(slug_for_value(&json!([0, 2])), "option-0-2");
        assert_eq!(slug_for_value(&json!(null)), FALLBACK_SLUG);
    }

    // Canonical form check rejects uppercase and stray dashes.
    #[test]
    fn is_slug_accepts_only_canonical_form() {
        assert!(is_slug("navy-blue-42"));
        assert!(!is_slug("Navy"));
        assert!(!is_slug("-navy"));
        assert!(!is_slug("navy--blue"));
        assert!(!is_slug(""));
    }
}
