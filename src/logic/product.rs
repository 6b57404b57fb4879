// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Product attribute validation against a subcategory's definitions.
//!
//! Validation is all-or-nothing: either every supplied attribute conforms and
//! the normalized map is returned, or an [`ErrorTree`] keyed by attribute id
//! lists exactly the attributes that failed.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::Limits;
use crate::error::CatalogError;
use crate::logic::value::validate_value;
use crate::models::attribute::AttributeDefinition;
use crate::models::error_tree::ErrorTree;
use crate::models::product::{
    AttributeValue, NormalizedAttributes, Product, ProductAttribute, ProductAttributeInput,
    ProductAttributeInputs, ProductDraft, Variant,
};
use crate::models::subcategory::Subcategory;
use crate::utils::slug::{is_slug, slug_for_value};
use crate::utils::type_name;

/// Reject attribute ids the subcategory does not define.
///
/// Runs before [`validate_product_attributes`], which only looks at defined ids.
pub fn check_attribute_references(
    definitions: &[AttributeDefinition],
    inputs: &ProductAttributeInputs,
) -> Result<(), CatalogError> {
    let known: HashSet<&str> = definitions.iter().map(|def| def.id.as_str()).collect();
    let unknown: Vec<String> = inputs
        .keys()
        .filter(|id| !known.contains(id.as_str()))
        .cloned()
        .collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::UnknownAttributes(unknown))
    }
}

/// Validate candidate product attributes with default [`Limits`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use catattr::logic::product::validate_product_attributes;
/// use catattr::models::attribute::{AttributeDefinition, AttributeKind, NumberMetadata};
/// use catattr::models::product::ProductAttributeInputs;
///
/// let defs = vec![AttributeDefinition::new(
///     "a1",
///     "Size",
///     AttributeKind::Number(NumberMetadata {
///         min: Some(2.0),
///         max: Some(16.0),
///         ..Default::default()
///     }),
/// )
/// .required(true)];
///
/// let bad: ProductAttributeInputs = serde_json::from_value(json!({"a1": {"value": 20}})).unwrap();
/// let err = validate_product_attributes(&defs, &bad).unwrap_err();
/// assert!(err.at(&["a1", "value"]).is_some());
///
/// let good: ProductAttributeInputs =
///     serde_json::from_value(json!({"a1": {"value": 10}})).unwrap();
/// let normalized = validate_product_attributes(&defs, &good).unwrap();
/// assert_eq!(serde_json::to_value(&normalized).unwrap(), json!({"a1": {"value": 10}}));
/// ```
pub fn validate_product_attributes(
    definitions: &[AttributeDefinition],
    inputs: &ProductAttributeInputs,
) -> Result<NormalizedAttributes, ErrorTree> {
    validate_product_attributes_with(definitions, inputs, &Limits::default())
}

/// Validate candidate product attributes against `definitions`.
///
/// For each definition:
/// - required and not supplied: `"attribute required"` on the attribute id;
/// - variant attributes must carry `variants`, each validated by index;
/// - plain attributes must carry a non-null `value`, validated once.
///
/// Ids in `inputs` without a definition are ignored here; see
/// [`check_attribute_references`].
pub fn validate_product_attributes_with(
    definitions: &[AttributeDefinition],
    inputs: &ProductAttributeInputs,
    limits: &Limits,
) -> Result<NormalizedAttributes, ErrorTree> {
    let mut errors = ErrorTree::new();
    let mut normalized = NormalizedAttributes::new();

    for def in definitions {
        match inputs.get(&def.id) {
            None if def.required => errors.push_field(def.id.as_str(), "attribute required"),
            None => {}
            Some(input) => match validate_entry(def, input, limits) {
                Ok(value) => {
                    normalized.insert(def.id.clone(), value);
                }
                Err(entry_errors) => errors.insert(def.id.as_str(), entry_errors),
            },
        }
    }

    if errors.is_empty() {
        debug!(
            definitions = definitions.len(),
            supplied = normalized.len(),
            "product attributes accepted"
        );
        Ok(normalized)
    } else {
        warn!(
            failed = errors.keys().count(),
            messages = errors.message_count(),
            "product attributes rejected"
        );
        Err(errors)
    }
}

fn validate_entry(
    def: &AttributeDefinition,
    input: &ProductAttributeInput,
    limits: &Limits,
) -> Result<AttributeValue, ErrorTree> {
    let mut errors = ErrorTree::new();

    if def.variant {
        if input.value.is_some() {
            errors.push_field("value", "value is not allowed for variant attributes");
        }
        let variants = match &input.variants {
            None => {
                errors.push_field("variants", "variants required");
                None
            }
            Some(Value::Array(items)) if items.is_empty() => {
                errors.push_field("variants", "at least one variant required");
                None
            }
            Some(Value::Array(items)) if items.len() > limits.max_variants => {
                errors.push_field(
                    "variants",
                    format!("at most {} variants allowed", limits.max_variants),
                );
                None
            }
            Some(Value::Array(items)) => match validate_variants(def, items) {
                Ok(variants) => Some(variants),
                Err(variant_errors) => {
                    errors.insert("variants", variant_errors);
                    None
                }
            },
            Some(other) => {
                errors.push_field(
                    "variants",
                    format!("expected array, received {}", type_name(other)),
                );
                None
            }
        };
        return match variants {
            Some(variants) if errors.is_empty() => Ok(AttributeValue::Variants(variants)),
            _ => Err(errors),
        };
    }

    if input.variants.is_some() {
        errors.push_field(
            "variants",
            "variants are not allowed for non-variant attributes",
        );
    }
    let value = match &input.value {
        None => {
            errors.push_field("value", "value required");
            None
        }
        Some(raw) => match validate_value(&def.kind, raw) {
            Ok(value) => Some(value),
            Err(value_errors) => {
                errors.insert("value", value_errors);
                None
            }
        },
    };
    match value {
        Some(value) if errors.is_empty() => Ok(AttributeValue::Value(value)),
        _ => Err(errors),
    }
}

/// Validate each `{value, slug}` item; errors are keyed by index.
fn validate_variants(
    def: &AttributeDefinition,
    items: &[Value],
) -> Result<Vec<Variant>, ErrorTree> {
    let mut errors = ErrorTree::new();
    let mut variants = Vec::with_capacity(items.len());
    let mut seen_slugs = BTreeSet::new();

    for (idx, item) in items.iter().enumerate() {
        let key = idx.to_string();
        let Some(obj) = item.as_object() else {
            errors.push_field(
                key,
                format!("expected object, received {}", type_name(item)),
            );
            continue;
        };

        let value = match obj.get("value") {
            None | Some(Value::Null) => {
                errors.push_field(key.as_str(), "value required");
                None
            }
            Some(raw) => match validate_value(&def.kind, raw) {
                Ok(value) => Some(value),
                Err(value_errors) => {
                    errors.insert(key.as_str(), value_errors);
                    None
                }
            },
        };

        let slug = match obj.get("slug") {
            None | Some(Value::Null) => value.as_ref().map(slug_for_value),
            Some(Value::String(s)) if s.is_empty() => value.as_ref().map(slug_for_value),
            Some(Value::String(s)) if is_slug(s) => Some(s.clone()),
            Some(Value::String(_)) => {
                errors.push_path(
                    [key.as_str(), "slug"],
                    "slug must contain only lowercase letters, digits and single dashes",
                );
                None
            }
            Some(other) => {
                errors.push_path(
                    [key.as_str(), "slug"],
                    format!("expected string, received {}", type_name(other)),
                );
                None
            }
        };

        if let Some(slug) = &slug
            && !seen_slugs.insert(slug.clone())
        {
            errors.push_path([key.as_str(), "slug"], format!("duplicate slug '{slug}'"));
        }

        if let (Some(value), Some(slug)) = (value, slug) {
            variants.push(Variant { value, slug });
        }
    }

    errors.into_result(variants)
}

/// Create a product under `subcategory`.
///
/// Unknown attribute ids are rejected first, then every supplied attribute is
/// validated against the subcategory's current definitions. Nothing is
/// returned unless all attributes pass.
pub fn create_product(
    subcategory: &Subcategory,
    draft: ProductDraft,
    limits: &Limits,
) -> Result<Product, CatalogError> {
    check_attribute_references(&subcategory.attributes, &draft.attributes)?;
    let mut normalized =
        validate_product_attributes_with(&subcategory.attributes, &draft.attributes, limits)
            .map_err(CatalogError::InvalidProductAttributes)?;

    // Keep the subcategory's declaration order.
    let attributes = subcategory
        .attributes
        .iter()
        .filter_map(|def| {
            normalized.remove(&def.id).map(|value| ProductAttribute {
                attribute: def.id.clone(),
                value,
            })
        })
        .collect();

    let product = Product {
        id: Uuid::new_v4().simple().to_string(),
        name: draft.name.trim().to_string(),
        subcategory: subcategory.id.clone(),
        attributes,
    };
    debug!(product = %product.id, subcategory = %subcategory.id, "product created");
    Ok(product)
}
