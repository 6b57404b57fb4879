// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Bulk create/update/delete of a subcategory's attribute definitions.
//!
//! A request carries exactly one non-empty list. The whole request is
//! validated before anything changes; on success the caller receives the
//! complete replacement attribute list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Limits;
use crate::error::CatalogError;
use crate::logic::definition::{IdPolicy, parse_definition};
use crate::models::attribute::AttributeDefinition;
use crate::models::error_tree::ErrorTree;

/// Raw bulk request as received from a client.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSetRequest {
    /// New attribute payloads; ids are generated.
    #[serde(default)]
    pub create: Vec<Value>,
    /// Full replacement payloads for existing attributes, matched by `id`.
    #[serde(default)]
    pub update: Vec<Value>,
    /// Ids of attributes to remove.
    #[serde(default)]
    pub delete: Vec<String>,
}

/// Which list of an [`AttributeSetRequest`] is in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeSetOperation {
    Create,
    Update,
    Delete,
}

impl AttributeSetOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl AttributeSetRequest {
    /// The single operation this request performs, if exactly one list is non-empty.
    pub fn operation(&self) -> Option<AttributeSetOperation> {
        match (
            self.create.is_empty(),
            self.update.is_empty(),
            self.delete.is_empty(),
        ) {
            (false, true, true) => Some(AttributeSetOperation::Create),
            (true, false, true) => Some(AttributeSetOperation::Update),
            (true, true, false) => Some(AttributeSetOperation::Delete),
            _ => None,
        }
    }
}

/// Apply a bulk request to `current`, returning the new attribute list.
///
/// Names must stay unique case-insensitively across the resulting list.
/// Update and delete ids must be unique within their list and name existing
/// attributes.
pub fn apply_attribute_set(
    current: &[AttributeDefinition],
    request: &AttributeSetRequest,
    limits: &Limits,
) -> Result<Vec<AttributeDefinition>, CatalogError> {
    let Some(operation) = request.operation() else {
        return Err(CatalogError::InvalidAttributeSet(ErrorTree::with_message(
            "exactly one of create, update or delete must be provided",
        )));
    };

    let result = match operation {
        AttributeSetOperation::Create => create_attributes(current, &request.create),
        AttributeSetOperation::Update => update_attributes(current, &request.update),
        AttributeSetOperation::Delete => delete_attributes(current, &request.delete),
    };

    let attributes = result.map_err(|errors| {
        warn!(
            operation = operation.as_str(),
            messages = errors.message_count(),
            "attribute set rejected"
        );
        let mut tree = ErrorTree::new();
        tree.insert(operation.as_str(), errors);
        CatalogError::InvalidAttributeSet(tree)
    })?;

    // Only growth is capped so an over-limit list can still shrink.
    if attributes.len() > current.len() && attributes.len() > limits.max_attributes {
        return Err(CatalogError::LimitExceeded {
            what: "attributes",
            limit: limits.max_attributes,
            actual: attributes.len(),
        });
    }

    info!(
        operation = operation.as_str(),
        before = current.len(),
        after = attributes.len(),
        "attribute set applied"
    );
    Ok(attributes)
}

fn create_attributes(
    current: &[AttributeDefinition],
    payloads: &[Value],
) -> Result<Vec<AttributeDefinition>, ErrorTree> {
    let mut errors = ErrorTree::new();
    let mut names: HashSet<String> = current.iter().map(AttributeDefinition::name_key).collect();
    let mut attributes = current.to_vec();

    for (idx, raw) in payloads.iter().enumerate() {
        match parse_definition(raw, IdPolicy::Generate) {
            Ok(def) => {
                if !names.insert(def.name_key()) {
                    errors.push_path([idx.to_string(), "name".to_string()], duplicate_name(&def));
                }
                attributes.push(def);
            }
            Err(entry_errors) => errors.insert(idx.to_string(), entry_errors),
        }
    }
    errors.into_result(attributes)
}

fn update_attributes(
    current: &[AttributeDefinition],
    payloads: &[Value],
) -> Result<Vec<AttributeDefinition>, ErrorTree> {
    let mut errors = ErrorTree::new();
    let positions: HashMap<&str, usize> = current
        .iter()
        .enumerate()
        .map(|(pos, def)| (def.id.as_str(), pos))
        .collect();
    let mut attributes = current.to_vec();
    let mut seen_ids = HashSet::new();
    // Index of each accepted update within `payloads`, keyed by position in `attributes`.
    let mut updated: HashMap<usize, usize> = HashMap::new();

    for (idx, raw) in payloads.iter().enumerate() {
        let def = match parse_definition(raw, IdPolicy::Required) {
            Ok(def) => def,
            Err(entry_errors) => {
                errors.insert(idx.to_string(), entry_errors);
                continue;
            }
        };
        if !seen_ids.insert(def.id.clone()) {
            errors.push_path([idx.to_string(), "id".to_string()], "duplicate id");
            continue;
        }
        match positions.get(def.id.as_str()) {
            Some(&pos) => {
                attributes[pos] = def;
                updated.insert(pos, idx);
            }
            None => errors.push_path([idx.to_string(), "id".to_string()], "attribute not found"),
        }
    }

    // Names are checked against the final list so renames can swap freely.
    let mut name_counts: HashMap<String, usize> = HashMap::new();
    for def in &attributes {
        *name_counts.entry(def.name_key()).or_default() += 1;
    }
    for (&pos, &idx) in &updated {
        let def = &attributes[pos];
        if name_counts.get(&def.name_key()).copied().unwrap_or_default() > 1 {
            errors.push_path([idx.to_string(), "name".to_string()], duplicate_name(def));
        }
    }

    errors.into_result(attributes)
}

fn delete_attributes(
    current: &[AttributeDefinition],
    ids: &[String],
) -> Result<Vec<AttributeDefinition>, ErrorTree> {
    let mut errors = ErrorTree::new();
    let known: HashSet<&str> = current.iter().map(|def| def.id.as_str()).collect();
    let mut doomed = HashSet::new();

    for (idx, id) in ids.iter().enumerate() {
        let id = id.trim();
        if id.is_empty() {
            errors.push_field(idx.to_string(), "id required");
        } else if !doomed.insert(id) {
            errors.push_field(idx.to_string(), "duplicate id");
        } else if !known.contains(id) {
            errors.push_field(idx.to_string(), "attribute not found");
        }
    }

    let remaining = current
        .iter()
        .filter(|def| !doomed.contains(def.id.as_str()))
        .cloned()
        .collect();
    errors.into_result(remaining)
}

fn duplicate_name(def: &AttributeDefinition) -> String {
    format!("attribute name '{}' already exists", def.name)
}
