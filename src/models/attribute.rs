// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Attribute definitions declared by a subcategory.
//!
//! An attribute's metadata shape is fully determined by its type, so the type
//! and its metadata travel together in [`AttributeKind`]. Serialized, the kind
//! is flattened into the definition as `"type"` plus an optional `"metadata"`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::CatalogError;
use crate::logic::definition::{IdPolicy, parse_definition};
use crate::utils::json::{serialize_number, serialize_opt_number};

/// Closed set of attribute types a subcategory can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    Text,
    Number,
    Boolean,
    Select,
    MultiSelect,
    Color,
    Date,
    Json,
}

impl AttributeType {
    pub const ALL: [AttributeType; 8] = [
        Self::Text,
        Self::Number,
        Self::Boolean,
        Self::Select,
        Self::MultiSelect,
        Self::Color,
        Self::Date,
        Self::Json,
    ];

    /// Parse the wire token (e.g. `"MULTI_SELECT"`). Matching is exact.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    /// String form used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Boolean => "BOOLEAN",
            Self::Select => "SELECT",
            Self::MultiSelect => "MULTI_SELECT",
            Self::Color => "COLOR",
            Self::Date => "DATE",
            Self::Json => "JSON",
        }
    }

    /// Whether definitions of this type may carry a `metadata` object.
    pub fn accepts_metadata(&self) -> bool {
        !matches!(self, Self::Boolean | Self::Color | Self::Json)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TEXT metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

/// NUMBER metadata. `unit`, `template` and `base` are display hints.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NumberMetadata {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub min: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub base: Option<f64>,
}

/// One option of a numeric SELECT/MULTI_SELECT.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NumberOption {
    #[serde(serialize_with = "serialize_number")]
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_number"
    )]
    pub base: Option<f64>,
}

/// SELECT/MULTI_SELECT metadata: the option list, tagged by option type.
///
/// Serialized as `{"type": "TEXT", "options": [...]}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectMetadata {
    Text(Vec<String>),
    Number(Vec<NumberOption>),
}

impl SelectMetadata {
    /// Number of selectable options.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(options) => options.len(),
            Self::Number(options) => options.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// DATE metadata with optional inclusive bounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DateMetadata {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub min: Option<OffsetDateTime>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub max: Option<OffsetDateTime>,
}

/// Attribute type together with exactly the metadata that type allows.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "metadata", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeKind {
    Text(TextMetadata),
    Number(NumberMetadata),
    Boolean,
    Select(SelectMetadata),
    MultiSelect(SelectMetadata),
    Color,
    Date(DateMetadata),
    Json,
}

impl AttributeKind {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            Self::Text(_) => AttributeType::Text,
            Self::Number(_) => AttributeType::Number,
            Self::Boolean => AttributeType::Boolean,
            Self::Select(_) => AttributeType::Select,
            Self::MultiSelect(_) => AttributeType::MultiSelect,
            Self::Color => AttributeType::Color,
            Self::Date(_) => AttributeType::Date,
            Self::Json => AttributeType::Json,
        }
    }
}

/// Typed attribute definition embedded in a subcategory.
///
/// Deserialization runs the full definition-time validation, so a stored
/// definition that no longer satisfies the shape rules fails to load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct AttributeDefinition {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: AttributeKind,
    pub required: bool,
    pub variant: bool,
}

impl AttributeDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            required: false,
            variant: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn variant(mut self, variant: bool) -> Self {
        self.variant = variant;
        self
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.kind.attribute_type()
    }

    /// Case-insensitive name comparison key.
    pub fn name_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

impl TryFrom<Value> for AttributeDefinition {
    type Error = CatalogError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        parse_definition(&raw, IdPolicy::Required).map_err(CatalogError::InvalidDefinition)
    }
}
