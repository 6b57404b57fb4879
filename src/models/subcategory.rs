// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Catalogue subcategory owning its attribute definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Limits;
use crate::error::CatalogError;
use crate::logic::attribute_set::{AttributeSetRequest, apply_attribute_set};
use crate::models::attribute::AttributeDefinition;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

impl Subcategory {
    /// Empty subcategory with a generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, id: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|def| def.id == id)
    }

    /// Apply a bulk attribute request. The attribute list is only replaced
    /// when the whole request is valid.
    pub fn set_attributes(
        &mut self,
        request: &AttributeSetRequest,
        limits: &Limits,
    ) -> Result<(), CatalogError> {
        self.attributes = apply_attribute_set(&self.attributes, request, limits)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // A failed request leaves the existing attributes untouched.
    #[test]
    fn set_attributes_is_atomic() {
        let mut sub = Subcategory::new("Laptops");
        let create: AttributeSetRequest = serde_json::from_value(json!({"create": [
            {
                "name": "RAM", "type": "SELECT",
                "metadata": {
                    "type": "NUMBER",
                    "options": [{"value": 8, "unit": "GB"}, {"value": 16, "unit": "GB"}]
                }
            }
        ]}))
        .unwrap();
        sub.set_attributes(&create, &Limits::default()).unwrap();
        assert_eq!(sub.attributes.len(), 1);
        let ram_id = sub.attributes[0].id.clone();
        assert!(sub.attribute(&ram_id).is_some());

        let bad: AttributeSetRequest = serde_json::from_value(json!({"create": [
            {"name": "Panel", "type": "TEXT"},
            {"name": "ram", "type": "TEXT"}
        ]}))
        .unwrap();
        assert!(sub.set_attributes(&bad, &Limits::default()).is_err());
        assert_eq!(sub.attributes.len(), 1);
    }

    // Subcategories round-trip through JSON with validated attributes.
    #[test]
    fn subcategory_round_trips_through_json() {
        let raw = json!({
            "id": "sub1",
            "name": "Shirts",
            "attributes": [
                {"id": "c1", "name": "Colour", "type": "COLOR", "required": true, "variant": true}
            ]
        });
        let sub: Subcategory = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&sub).unwrap(), raw);

        let broken = json!({
            "id": "s", "name": "S", "attributes": [{"id": "x", "name": "X", "type": "SELECT"}]
        });
        assert!(serde_json::from_value::<Subcategory>(broken).is_err());
    }
}
