// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Product attribute payloads and the validated product model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Candidate attribute entry as supplied by a client.
///
/// Both fields stay untyped so shape problems can be reported per attribute
/// instead of failing the whole payload at deserialization time. A JSON
/// `null` is treated the same as an absent field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttributeInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<Value>,
}

/// Candidate attribute map keyed by attribute id.
pub type ProductAttributeInputs = BTreeMap<String, ProductAttributeInput>;

/// One variant of a variant attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub value: Value,
    pub slug: String,
}

/// Validated attribute payload: a single value or a variant list, never both.
///
/// Serialized as `{"value": ..}` or `{"variants": [..]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeValue {
    Value(Value),
    Variants(Vec<Variant>),
}

/// Validated attribute map keyed by attribute id.
pub type NormalizedAttributes = BTreeMap<String, AttributeValue>;

/// Attribute value stored on a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub attribute: String,
    #[serde(flatten)]
    pub value: AttributeValue,
}

/// Input for product creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub attributes: ProductAttributeInputs,
}

/// Product whose attributes were validated against its subcategory at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub subcategory: String,
    pub attributes: Vec<ProductAttribute>,
}

impl Product {
    pub fn attribute(&self, id: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attr| attr.attribute == id)
            .map(|attr| &attr.value)
    }
}
