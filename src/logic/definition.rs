// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Definition-time validation of attribute payloads.
//!
//! Turns an untyped JSON attribute payload into an [`AttributeDefinition`],
//! checking that the metadata matches the declared type. Failures are
//! reported per field so callers can point at the offending input.

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::CatalogError;
use crate::models::attribute::{
    AttributeDefinition, AttributeKind, AttributeType, DateMetadata, NumberMetadata, NumberOption,
    SelectMetadata, TextMetadata,
};
use crate::models::error_tree::ErrorTree;
use crate::utils::{parse_datetime, type_name};

/// How the `id` field of a payload is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdPolicy {
    /// The payload must carry a non-blank `id` (stored and updated attributes).
    Required,
    /// Use the payload's `id` when present, otherwise generate one.
    Optional,
    /// Ignore any supplied `id` and generate a fresh one (created attributes).
    Generate,
}

/// Fresh opaque attribute id.
pub fn new_attribute_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Validate a single attribute payload, generating an id when none is given.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use catattr::logic::definition::validate_definition;
/// use catattr::models::attribute::AttributeType;
///
/// let def = validate_definition(&json!({
///     "name": "Weight",
///     "type": "NUMBER",
///     "metadata": { "min": 0, "unit": "kg" }
/// }))
/// .unwrap();
/// assert_eq!(def.attribute_type(), AttributeType::Number);
///
/// let err = validate_definition(&json!({
///     "name": "Weight",
///     "type": "NUMBER",
///     "metadata": { "min": 5, "max": 1 }
/// }))
/// .unwrap_err();
/// let tree = err.tree().unwrap();
/// assert!(tree.at(&["metadata", "min"]).is_some());
/// assert!(tree.at(&["metadata", "max"]).is_some());
/// ```
pub fn validate_definition(raw: &Value) -> Result<AttributeDefinition, CatalogError> {
    parse_definition(raw, IdPolicy::Optional).map_err(CatalogError::InvalidDefinition)
}

/// Parse and validate an attribute payload.
///
/// Checks `id` according to `ids`, requires a non-blank `name` and a known
/// `type`, accepts optional boolean `required`/`variant` flags, and validates
/// `metadata` against the declared type. Unknown top-level keys are ignored;
/// unknown metadata keys are rejected.
pub fn parse_definition(raw: &Value, ids: IdPolicy) -> Result<AttributeDefinition, ErrorTree> {
    let Some(obj) = raw.as_object() else {
        return Err(ErrorTree::with_message(format!(
            "expected object, received {}",
            type_name(raw)
        )));
    };

    let mut errors = ErrorTree::new();

    let id = match ids {
        IdPolicy::Generate => Some(new_attribute_id()),
        IdPolicy::Required => required_string(obj, "id", &mut errors),
        IdPolicy::Optional => match obj.get("id") {
            None | Some(Value::Null) => Some(new_attribute_id()),
            Some(_) => required_string(obj, "id", &mut errors),
        },
    };
    let name = required_string(obj, "name", &mut errors);
    let required = optional_bool(obj, "required", &mut errors).unwrap_or(false);
    let variant = optional_bool(obj, "variant", &mut errors).unwrap_or(false);

    let kind = match obj.get("type") {
        None | Some(Value::Null) => {
            errors.push_field("type", "type required");
            None
        }
        Some(Value::String(token)) => match AttributeType::parse(token.trim()) {
            Some(ty) => match parse_kind(ty, obj.get("metadata")) {
                Ok(kind) => Some(kind),
                Err(meta_errors) => {
                    errors.insert("metadata", meta_errors);
                    None
                }
            },
            None => {
                errors.push_field("type", format!("invalid attribute type '{token}'"));
                None
            }
        },
        Some(other) => {
            errors.push_field(
                "type",
                format!("expected string, received {}", type_name(other)),
            );
            None
        }
    };

    match (id, name, kind) {
        (Some(id), Some(name), Some(kind)) if errors.is_empty() => Ok(AttributeDefinition {
            id,
            name,
            kind,
            required,
            variant,
        }),
        _ => {
            debug!(
                messages = errors.message_count(),
                "attribute definition rejected"
            );
            Err(errors)
        }
    }
}

/// Build the typed kind for `ty` from its raw metadata.
fn parse_kind(ty: AttributeType, metadata: Option<&Value>) -> Result<AttributeKind, ErrorTree> {
    let metadata = metadata.filter(|m| !m.is_null());
    if metadata.is_some() && !ty.accepts_metadata() {
        return Err(ErrorTree::with_message(format!(
            "metadata is not allowed for {ty} attributes"
        )));
    }
    match ty {
        AttributeType::Text => parse_text_metadata(metadata).map(AttributeKind::Text),
        AttributeType::Number => parse_number_metadata(metadata).map(AttributeKind::Number),
        AttributeType::Select => parse_select_metadata(metadata).map(AttributeKind::Select),
        AttributeType::MultiSelect => {
            parse_select_metadata(metadata).map(AttributeKind::MultiSelect)
        }
        AttributeType::Date => parse_date_metadata(metadata).map(AttributeKind::Date),
        AttributeType::Boolean => Ok(AttributeKind::Boolean),
        AttributeType::Color => Ok(AttributeKind::Color),
        AttributeType::Json => Ok(AttributeKind::Json),
    }
}

fn parse_text_metadata(metadata: Option<&Value>) -> Result<TextMetadata, ErrorTree> {
    let Some(obj) = metadata_object(metadata, false)? else {
        return Ok(TextMetadata::default());
    };
    let mut errors = ErrorTree::new();
    reject_unknown_fields(obj, &["maxLength"], &mut errors);
    let max_length = optional_positive_int(obj, "maxLength", &mut errors);
    errors.into_result(TextMetadata { max_length })
}

fn parse_number_metadata(metadata: Option<&Value>) -> Result<NumberMetadata, ErrorTree> {
    let Some(obj) = metadata_object(metadata, false)? else {
        return Ok(NumberMetadata::default());
    };
    let mut errors = ErrorTree::new();
    reject_unknown_fields(obj, &["min", "max", "unit", "template", "base"], &mut errors);

    let min = optional_number(obj, "min", &mut errors);
    let max = optional_number(obj, "max", &mut errors);
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        push_bounds_conflict(&mut errors);
    }

    let meta = NumberMetadata {
        min,
        max,
        unit: optional_string(obj, "unit", &mut errors),
        template: optional_string(obj, "template", &mut errors),
        base: optional_positive_number(obj, "base", &mut errors),
    };
    errors.into_result(meta)
}

fn parse_date_metadata(metadata: Option<&Value>) -> Result<DateMetadata, ErrorTree> {
    let Some(obj) = metadata_object(metadata, false)? else {
        return Ok(DateMetadata::default());
    };
    let mut errors = ErrorTree::new();
    reject_unknown_fields(obj, &["min", "max"], &mut errors);

    let mut bound = |key: &str| match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => {
            let parsed = parse_datetime(raw);
            if parsed.is_none() {
                errors.push_field(key, "invalid ISO datetime");
            }
            parsed
        }
        Some(other) => {
            errors.push_field(
                key,
                format!("expected ISO datetime string, received {}", type_name(other)),
            );
            None
        }
    };
    let min = bound("min");
    let max = bound("max");

    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        push_bounds_conflict(&mut errors);
    }
    errors.into_result(DateMetadata { min, max })
}

fn parse_select_metadata(metadata: Option<&Value>) -> Result<SelectMetadata, ErrorTree> {
    let Some(obj) = metadata_object(metadata, true)? else {
        return Err(ErrorTree::with_message("metadata required"));
    };
    let mut errors = ErrorTree::new();
    reject_unknown_fields(obj, &["type", "options"], &mut errors);

    let option_type = match obj.get("type") {
        None | Some(Value::Null) => {
            errors.push_field("type", "type required");
            None
        }
        Some(Value::String(token)) => match AttributeType::parse(token.trim()) {
            Some(ty @ (AttributeType::Text | AttributeType::Number)) => Some(ty),
            _ => {
                errors.push_field("type", "option type must be TEXT or NUMBER");
                None
            }
        },
        Some(other) => {
            errors.push_field(
                "type",
                format!("expected string, received {}", type_name(other)),
            );
            None
        }
    };

    let items = match obj.get("options") {
        None | Some(Value::Null) => {
            errors.push_field("options", "options required");
            None
        }
        Some(Value::Array(items)) if items.is_empty() => {
            errors.push_field("options", "at least one option required");
            None
        }
        Some(Value::Array(items)) => Some(items),
        Some(other) => {
            errors.push_field(
                "options",
                format!("expected array, received {}", type_name(other)),
            );
            None
        }
    };

    let (Some(option_type), Some(items)) = (option_type, items) else {
        return Err(errors);
    };

    let mut option_errors = ErrorTree::new();
    let select = if option_type == AttributeType::Text {
        let mut options = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item {
                Value::String(s) if !s.trim().is_empty() => options.push(s.clone()),
                Value::String(_) => {
                    option_errors.push_field(idx.to_string(), "option must not be empty")
                }
                other => option_errors.push_field(
                    idx.to_string(),
                    format!("expected string, received {}", type_name(other)),
                ),
            }
        }
        SelectMetadata::Text(options)
    } else {
        let mut options = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match parse_number_option(item) {
                Ok(option) => options.push(option),
                Err(item_errors) => option_errors.insert(idx.to_string(), item_errors),
            }
        }
        SelectMetadata::Number(options)
    };
    errors.insert("options", option_errors);
    errors.into_result(select)
}

fn parse_number_option(item: &Value) -> Result<NumberOption, ErrorTree> {
    let Some(obj) = item.as_object() else {
        return Err(ErrorTree::with_message(format!(
            "expected object, received {}",
            type_name(item)
        )));
    };
    let mut errors = ErrorTree::new();
    reject_unknown_fields(obj, &["value", "unit", "template", "base"], &mut errors);

    let value = match obj.get("value") {
        None | Some(Value::Null) => {
            errors.push_field("value", "value required");
            None
        }
        Some(_) => optional_number(obj, "value", &mut errors),
    };
    let option = NumberOption {
        value: value.unwrap_or_default(),
        unit: optional_string(obj, "unit", &mut errors),
        template: optional_string(obj, "template", &mut errors),
        base: optional_positive_number(obj, "base", &mut errors),
    };
    errors.into_result(option)
}

/// `min > max`: report on both fields, never as one combined message.
fn push_bounds_conflict(errors: &mut ErrorTree) {
    errors.push_field("min", "min must be less than or equal to max");
    errors.push_field("max", "max must be greater than or equal to min");
}

/// Resolve the metadata object, or `None` when it is absent and optional.
fn metadata_object(
    metadata: Option<&Value>,
    required: bool,
) -> Result<Option<&Map<String, Value>>, ErrorTree> {
    match metadata {
        None if required => Err(ErrorTree::with_message("metadata required")),
        None => Ok(None),
        Some(Value::Object(obj)) => Ok(Some(obj)),
        Some(other) => Err(ErrorTree::with_message(format!(
            "expected object, received {}",
            type_name(other)
        ))),
    }
}

fn reject_unknown_fields(obj: &Map<String, Value>, allowed: &[&str], errors: &mut ErrorTree) {
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            errors.push_field(key.as_str(), "unrecognized field");
        }
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ErrorTree,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            errors.push_field(key, format!("{key} required"));
            None
        }
        Some(other) => {
            errors.push_field(key, format!("expected string, received {}", type_name(other)));
            None
        }
    }
}

fn optional_string(obj: &Map<String, Value>, key: &str, errors: &mut ErrorTree) -> Option<String> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push_field(key, format!("expected string, received {}", type_name(other)));
            None
        }
    }
}

fn optional_bool(obj: &Map<String, Value>, key: &str, errors: &mut ErrorTree) -> Option<bool> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            errors.push_field(key, format!("expected boolean, received {}", type_name(other)));
            None
        }
    }
}

fn optional_number(obj: &Map<String, Value>, key: &str, errors: &mut ErrorTree) -> Option<f64> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            errors.push_field(key, format!("expected number, received {}", type_name(other)));
            None
        }
    }
}

fn optional_positive_number(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ErrorTree,
) -> Option<f64> {
    let value = optional_number(obj, key, errors)?;
    if value > 0.0 {
        Some(value)
    } else {
        errors.push_field(key, "must be a positive number");
        None
    }
}

fn optional_positive_int(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ErrorTree,
) -> Option<u32> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => match n.as_u64().and_then(|v| u32::try_from(v).ok()) {
            Some(v) if v > 0 => Some(v),
            _ => {
                errors.push_field(key, "must be a positive integer");
                None
            }
        },
        Some(other) => {
            errors.push_field(key, format!("expected number, received {}", type_name(other)));
            None
        }
    }
}
