// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Errors surfaced to callers of the catalogue operations.

use serde_json::json;
use thiserror::Error;

use crate::models::error_tree::ErrorTree;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A single attribute definition payload is malformed.
    #[error("invalid attribute definition: {0}")]
    InvalidDefinition(ErrorTree),

    /// A bulk create/update/delete request on a subcategory's attributes was rejected.
    #[error("invalid attribute set: {0}")]
    InvalidAttributeSet(ErrorTree),

    /// Product attribute values do not conform to the subcategory's definitions.
    #[error("invalid product attributes: {0}")]
    InvalidProductAttributes(ErrorTree),

    /// The product references attribute ids its subcategory does not define.
    #[error("unknown attribute ids: {}", .0.join(", "))]
    UnknownAttributes(Vec<String>),

    /// A configured size limit was exceeded.
    #[error("{what} limit exceeded: {actual} > {limit}")]
    LimitExceeded {
        what: &'static str,
        limit: usize,
        actual: usize,
    },
}

impl CatalogError {
    /// HTTP status a transport layer should map this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownAttributes(_) => 404,
            Self::InvalidDefinition(_)
            | Self::InvalidAttributeSet(_)
            | Self::InvalidProductAttributes(_)
            | Self::LimitExceeded { .. } => 422,
        }
    }

    /// Structured error tree, when the error carries one.
    pub fn tree(&self) -> Option<&ErrorTree> {
        match self {
            Self::InvalidDefinition(tree)
            | Self::InvalidAttributeSet(tree)
            | Self::InvalidProductAttributes(tree) => Some(tree),
            Self::UnknownAttributes(_) | Self::LimitExceeded { .. } => None,
        }
    }

    /// `{"message": .., "errors": ..}` payload for response bodies.
    pub fn to_payload(&self) -> serde_json::Value {
        let errors = match self {
            Self::UnknownAttributes(ids) => {
                let mut tree = ErrorTree::new();
                for id in ids {
                    tree.push_field(id.as_str(), "unknown attribute");
                }
                tree.to_json()
            }
            Self::LimitExceeded { what, limit, .. } => {
                ErrorTree::with_message(format!("at most {limit} {what} allowed")).to_json()
            }
            other => other.tree().map(ErrorTree::to_json).unwrap_or_default(),
        };
        let message = match self {
            Self::InvalidDefinition(_) => "invalid attribute definition".to_string(),
            Self::InvalidAttributeSet(_) => "invalid attribute set".to_string(),
            Self::InvalidProductAttributes(_) => "invalid product attributes".to_string(),
            other => other.to_string(),
        };
        json!({ "message": message, "errors": errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Validation failures map to 422 and referential failures to 404.
    #[test]
    fn status_codes_follow_error_class() {
        let tree = ErrorTree::with_message("bad");
        assert_eq!(CatalogError::InvalidProductAttributes(tree).status_code(), 422);
        assert_eq!(
            CatalogError::UnknownAttributes(vec!["zz".into()]).status_code(),
            404
        );
    }

    // Payload carries a short message next to the serialized tree.
    #[test]
    fn payload_wraps_error_tree() {
        let mut tree = ErrorTree::new();
        tree.push_field("a1", "attribute required");
        let payload = CatalogError::InvalidProductAttributes(tree).to_payload();
        assert_eq!(payload["message"], "invalid product attributes");
        assert_eq!(payload["errors"]["a1"][0], "attribute required");
    }

    // Unknown ids are listed in both the message and the errors object.
    #[test]
    fn unknown_attributes_payload_lists_ids() {
        let err = CatalogError::UnknownAttributes(vec!["x1".into(), "x2".into()]);
        assert_eq!(err.to_string(), "unknown attribute ids: x1, x2");
        let payload = err.to_payload();
        assert_eq!(payload["errors"]["x2"][0], "unknown attribute");
    }
}
