// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-type validation of product attribute values.
//!
//! [`validate_value`] checks one value against an attribute kind and returns
//! the normalized value. DATE values are normalized to RFC 3339 in UTC and
//! COLOR values drop unknown keys; everything else is returned unchanged.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::models::attribute::{
    AttributeKind, DateMetadata, NumberMetadata, SelectMetadata, TextMetadata,
};
use crate::models::error_tree::ErrorTree;
use crate::utils::{format_datetime, parse_datetime, type_name};

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#(?:[0-9a-f]{3}|[0-9a-f]{6})$").expect("hex color pattern compiles")
});

/// Validate `value` against `kind`, returning the normalized value.
///
/// Errors for composite values are nested one level deeper: per option index
/// for MULTI_SELECT, per key for JSON, and per `name`/`hexCode` for COLOR.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use catattr::logic::value::validate_value;
/// use catattr::models::attribute::{AttributeKind, NumberMetadata};
///
/// let kind = AttributeKind::Number(NumberMetadata {
///     min: Some(2.0),
///     max: Some(16.0),
///     ..Default::default()
/// });
/// assert_eq!(validate_value(&kind, &json!(10)).unwrap(), json!(10));
/// let err = validate_value(&kind, &json!(20)).unwrap_err();
/// assert_eq!(err.messages(), &["must be less than or equal to 16".to_string()]);
/// ```
pub fn validate_value(kind: &AttributeKind, value: &Value) -> Result<Value, ErrorTree> {
    match kind {
        AttributeKind::Text(meta) => validate_text(meta, value),
        AttributeKind::Number(meta) => validate_number(meta, value),
        AttributeKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            other => Err(expected("boolean", other)),
        },
        AttributeKind::Select(meta) => option_index(value, meta.len())
            .map(|_| value.clone())
            .map_err(ErrorTree::with_message),
        AttributeKind::MultiSelect(meta) => validate_multi_select(meta, value),
        AttributeKind::Color => validate_color(value),
        AttributeKind::Date(meta) => validate_date(meta, value),
        AttributeKind::Json => validate_json(value),
    }
}

fn expected(what: &str, value: &Value) -> ErrorTree {
    ErrorTree::with_message(format!("expected {what}, received {}", type_name(value)))
}

fn validate_text(meta: &TextMetadata, value: &Value) -> Result<Value, ErrorTree> {
    let Value::String(text) = value else {
        return Err(expected("string", value));
    };
    // Length counts characters, not bytes.
    if let Some(max) = meta.max_length
        && text.chars().count() > max as usize
    {
        return Err(ErrorTree::with_message(format!(
            "must contain at most {max} character(s)"
        )));
    }
    Ok(value.clone())
}

fn validate_number(meta: &NumberMetadata, value: &Value) -> Result<Value, ErrorTree> {
    let Some(number) = value.as_f64() else {
        return Err(expected("number", value));
    };
    let mut errors = ErrorTree::new();
    if let Some(min) = meta.min
        && number < min
    {
        errors.push(format!("must be greater than or equal to {min}"));
    }
    if let Some(max) = meta.max
        && number > max
    {
        errors.push(format!("must be less than or equal to {max}"));
    }
    errors.into_result(value.clone())
}

/// Resolve a SELECT index, accepting integral numbers only.
fn option_index(value: &Value, len: usize) -> Result<usize, String> {
    let Value::Number(n) = value else {
        return Err(format!(
            "expected integer option index, received {}",
            type_name(value)
        ));
    };
    let index = n
        .as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64));
    let Some(index) = index else {
        if n.is_u64() {
            return Err(out_of_range(len));
        }
        return Err("expected integer option index, received number".to_string());
    };
    match usize::try_from(index) {
        Ok(idx) if idx < len => Ok(idx),
        _ => Err(out_of_range(len)),
    }
}

fn out_of_range(len: usize) -> String {
    match len {
        0 => "no options available".to_string(),
        n => format!("option index must be between 0 and {}", n - 1),
    }
}

fn validate_multi_select(meta: &SelectMetadata, value: &Value) -> Result<Value, ErrorTree> {
    let Value::Array(items) = value else {
        return Err(expected("array", value));
    };
    let mut errors = ErrorTree::new();
    if items.len() > meta.len() {
        errors.push(format!("must contain at most {} option(s)", meta.len()));
    }
    for (idx, item) in items.iter().enumerate() {
        if let Err(message) = option_index(item, meta.len()) {
            errors.push_field(idx.to_string(), message);
        }
    }
    errors.into_result(value.clone())
}

fn validate_color(value: &Value) -> Result<Value, ErrorTree> {
    let Value::Object(obj) = value else {
        return Err(expected("object", value));
    };
    let mut errors = ErrorTree::new();

    match obj.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        None | Some(Value::Null) | Some(Value::String(_)) => {
            errors.push_field("name", "name required");
        }
        Some(other) => errors.push_field(
            "name",
            format!("expected string, received {}", type_name(other)),
        ),
    }
    match obj.get("hexCode") {
        Some(Value::String(code)) if HEX_COLOR.is_match(code) => {}
        Some(Value::String(_)) => errors.push_field("hexCode", "invalid hex color code"),
        None | Some(Value::Null) => errors.push_field("hexCode", "hexCode required"),
        Some(other) => errors.push_field(
            "hexCode",
            format!("expected string, received {}", type_name(other)),
        ),
    }

    let normalized: Map<String, Value> = ["name", "hexCode"]
        .into_iter()
        .filter_map(|key| obj.get(key).map(|v| (key.to_string(), v.clone())))
        .collect();
    errors.into_result(Value::Object(normalized))
}

fn validate_date(meta: &DateMetadata, value: &Value) -> Result<Value, ErrorTree> {
    let Value::String(raw) = value else {
        return Err(expected("date", value));
    };
    let Some(ts) = parse_datetime(raw) else {
        return Err(ErrorTree::with_message("invalid date"));
    };
    let mut errors = ErrorTree::new();
    if let Some(min) = meta.min
        && ts < min
    {
        errors.push(format!("must not be earlier than {}", format_datetime(min)));
    }
    if let Some(max) = meta.max
        && ts > max
    {
        errors.push(format!("must not be later than {}", format_datetime(max)));
    }
    errors.into_result(Value::String(format_datetime(ts)))
}

fn validate_json(value: &Value) -> Result<Value, ErrorTree> {
    let Value::Object(obj) = value else {
        return Err(expected("object", value));
    };
    let mut errors = ErrorTree::new();
    for (key, leaf) in obj {
        match leaf {
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {}
            other => errors.push_field(
                key.as_str(),
                format!(
                    "expected string, number or boolean, received {}",
                    type_name(other)
                ),
            ),
        }
    }
    errors.into_result(value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attribute::NumberOption;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn text_select(n: usize) -> SelectMetadata {
        SelectMetadata::Text((0..n).map(|i| format!("option {i}")).collect())
    }

    // TEXT enforces the string type and the character limit.
    #[test]
    fn text_checks_type_and_length() {
        let kind = AttributeKind::Text(TextMetadata { max_length: Some(3) });
        assert_eq!(validate_value(&kind, &json!("äöü")).unwrap(), json!("äöü"));
        assert_eq!(
            validate_value(&kind, &json!("long")).unwrap_err().messages(),
            &["must contain at most 3 character(s)".to_string()]
        );
        assert_eq!(
            validate_value(&kind, &json!(12)).unwrap_err().messages(),
            &["expected string, received number".to_string()]
        );
    }

    // NUMBER bounds are inclusive on both ends.
    #[test]
    fn number_bounds_are_inclusive() {
        let kind = AttributeKind::Number(NumberMetadata {
            min: Some(2.0),
            max: Some(16.0),
            ..Default::default()
        });
        assert!(validate_value(&kind, &json!(2)).is_ok());
        assert!(validate_value(&kind, &json!(16.0)).is_ok());
        assert_eq!(
            validate_value(&kind, &json!(1.5)).unwrap_err().messages(),
            &["must be greater than or equal to 2".to_string()]
        );
        assert_eq!(
            validate_value(&kind, &json!(20)).unwrap_err().messages(),
            &["must be less than or equal to 16".to_string()]
        );
        assert!(validate_value(&kind, &json!("10")).is_err());
    }

    // BOOLEAN accepts only JSON booleans.
    #[test]
    fn boolean_accepts_only_booleans() {
        assert!(validate_value(&AttributeKind::Boolean, &json!(false)).is_ok());
        assert!(validate_value(&AttributeKind::Boolean, &json!("true")).is_err());
        assert!(validate_value(&AttributeKind::Boolean, &json!(0)).is_err());
    }

    // SELECT rejects -1, N and non-integer indices.
    #[test]
    fn select_index_bounds() {
        let kind = AttributeKind::Select(SelectMetadata::Number(vec![
            NumberOption { value: 1.0, unit: None, template: None, base: None },
            NumberOption { value: 2.0, unit: None, template: None, base: None },
        ]));
        assert!(validate_value(&kind, &json!(0)).is_ok());
        assert!(validate_value(&kind, &json!(1)).is_ok());
        assert_eq!(
            validate_value(&kind, &json!(2)).unwrap_err().messages(),
            &["option index must be between 0 and 1".to_string()]
        );
        assert!(validate_value(&kind, &json!(-1)).is_err());
        assert_eq!(
            validate_value(&kind, &json!(0.5)).unwrap_err().messages(),
            &["expected integer option index, received number".to_string()]
        );
        assert!(validate_value(&kind, &json!("0")).is_err());
    }

    // MULTI_SELECT reports length at the root and bad indices per position.
    #[test]
    fn multi_select_nests_index_errors() {
        let kind = AttributeKind::MultiSelect(text_select(2));
        assert!(validate_value(&kind, &json!([1, 0])).is_ok());
        assert!(validate_value(&kind, &json!([])).is_ok());

        let err = validate_value(&kind, &json!([0, 1, 5])).unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({
                "_errors": ["must contain at most 2 option(s)"],
                "2": ["option index must be between 0 and 1"]
            })
        );
        assert!(validate_value(&kind, &json!(1)).is_err());
    }

    // COLOR nests name and hexCode errors and drops unknown keys.
    #[test]
    fn color_validates_each_field() {
        let ok = validate_value(
            &AttributeKind::Color,
            &json!({"name": "Red", "hexCode": "#F00", "extra": 1}),
        )
        .unwrap();
        assert_eq!(ok, json!({"name": "Red", "hexCode": "#F00"}));
        let teal = json!({"name": "Teal", "hexCode": "#008080"});
        assert!(validate_value(&AttributeKind::Color, &teal).is_ok());

        let err = validate_value(&AttributeKind::Color, &json!({"name": 4, "hexCode": "#ggg"}))
            .unwrap_err();
        assert_eq!(
            err.to_json(),
            json!({
                "name": ["expected string, received number"],
                "hexCode": ["invalid hex color code"]
            })
        );
        let short_hex = json!({"name": "x", "hexCode": "#12345"});
        assert!(validate_value(&AttributeKind::Color, &short_hex).is_err());
        assert!(validate_value(&AttributeKind::Color, &json!("#fff")).is_err());
    }

    // DATE normalizes to UTC and enforces bounds.
    #[test]
    fn date_normalizes_and_checks_bounds() {
        let kind = AttributeKind::Date(DateMetadata {
            min: parse_datetime("2020-01-01"),
            max: parse_datetime("2020-12-31T23:59:59Z"),
        });
        assert_eq!(
            validate_value(&kind, &json!("2020-06-01T12:00:00+02:00")).unwrap(),
            json!("2020-06-01T10:00:00Z")
        );
        assert_eq!(
            validate_value(&kind, &json!("2019-12-31")).unwrap_err().messages(),
            &["must not be earlier than 2020-01-01T00:00:00Z".to_string()]
        );
        assert_eq!(
            validate_value(&kind, &json!("2021-01-01")).unwrap_err().messages(),
            &["must not be later than 2020-12-31T23:59:59Z".to_string()]
        );
        assert_eq!(
            validate_value(&kind, &json!("soon")).unwrap_err().messages(),
            &["invalid date".to_string()]
        );
    }

    // JSON leaves must be scalars; errors are keyed by the offending key.
    #[test]
    fn json_reports_per_key_errors() {
        let ok = json!({"cpu": "M3", "cores": 8, "fanless": true});
        assert_eq!(validate_value(&AttributeKind::Json, &ok).unwrap(), ok);

        let err = validate_value(
            &AttributeKind::Json,
            &json!({"cpu": "M3", "ports": ["usb"], "extra": null}),
        )
        .unwrap_err();
        assert_eq!(err.keys().collect::<Vec<_>>(), vec!["extra", "ports"]);
        assert_eq!(
            err.get("ports").unwrap().messages(),
            &["expected string, number or boolean, received array".to_string()]
        );
        assert!(validate_value(&AttributeKind::Json, &json!([1])).is_err());
    }

    proptest! {
        // Indices in [0, N-1] pass, everything outside fails.
        #[test]
        fn select_bounds_property(n in 1usize..20, index in -5i64..25) {
            let kind = AttributeKind::Select(text_select(n));
            let result = validate_value(&kind, &json!(index));
            prop_assert_eq!(result.is_ok(), index >= 0 && (index as usize) < n);
        }

        // Arrays longer than the option list are always rejected.
        #[test]
        fn multi_select_length_property(n in 1usize..10, extra in 1usize..5) {
            let kind = AttributeKind::MultiSelect(text_select(n));
            let indices: Vec<usize> = (0..n + extra).map(|i| i % n).collect();
            prop_assert!(validate_value(&kind, &json!(indices)).is_err());
            let within: Vec<usize> = (0..n).collect();
            prop_assert!(validate_value(&kind, &json!(within)).is_ok());
        }
    }
}
