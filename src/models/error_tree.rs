// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Nested validation error report keyed by field path.
//!
//! Every validator in the crate reports failures as an [`ErrorTree`]: each node
//! holds an ordered, deduplicated list of messages plus child nodes keyed by
//! field name or list index. Serialized, a node with only messages becomes a
//! JSON array, a node with only children becomes an object, and a node with
//! both keeps its own messages under `_errors`.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key used for a node's own messages when it also has children.
pub const OWN_ERRORS_KEY: &str = "_errors";

/// Field-path keyed tree of validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorTree {
    messages: Vec<String>,
    fields: BTreeMap<String, ErrorTree>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree holding a single message at its root.
    pub fn with_message(message: impl Into<String>) -> Self {
        let mut tree = Self::new();
        tree.push(message);
        tree
    }

    /// True when no message was recorded anywhere in the tree.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.fields.values().all(ErrorTree::is_empty)
    }

    /// Record a message on this node; repeated messages are kept once.
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.messages.contains(&message) {
            self.messages.push(message);
        }
    }

    /// Record a message on the child node `key`.
    pub fn push_field(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.child_mut(key).push(message);
    }

    /// Record a message at a nested path, creating intermediate nodes.
    pub fn push_path<I, K>(&mut self, path: I, message: impl Into<String>)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut node = self;
        for key in path {
            node = node.child_mut(key);
        }
        node.push(message);
    }

    /// Attach a subtree under `key`, merging with anything already there.
    /// Empty subtrees are ignored.
    pub fn insert(&mut self, key: impl Into<String>, subtree: ErrorTree) {
        if subtree.is_empty() {
            return;
        }
        self.child_mut(key).merge(subtree);
    }

    /// Merge another tree into this one, node by node.
    pub fn merge(&mut self, other: ErrorTree) {
        for message in other.messages {
            self.push(message);
        }
        for (key, subtree) in other.fields {
            self.insert(key, subtree);
        }
    }

    /// Messages recorded directly on this node.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Child node for `key`, if any message was recorded beneath it.
    pub fn get(&self, key: &str) -> Option<&ErrorTree> {
        self.fields.get(key).filter(|tree| !tree.is_empty())
    }

    /// Follow a path of keys down the tree.
    pub fn at(&self, path: &[&str]) -> Option<&ErrorTree> {
        path.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Keys of non-empty children, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, tree)| !tree.is_empty())
            .map(|(key, _)| key.as_str())
    }

    /// Total number of messages in the tree.
    pub fn message_count(&self) -> usize {
        self.messages.len() + self.fields.values().map(ErrorTree::message_count).sum::<usize>()
    }

    /// Flatten into `(dotted.path, message)` pairs, depth first.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.message_count());
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }
        for (key, subtree) in &self.fields {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            subtree.flatten_into(&path, out);
        }
    }

    /// `Ok(value)` when the tree is empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, ErrorTree> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }

    /// Serialize to a `serde_json::Value` payload.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn child_mut(&mut self, key: impl Into<String>) -> &mut ErrorTree {
        self.fields.entry(key.into()).or_default()
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children: Vec<_> = self
            .fields
            .iter()
            .filter(|(_, tree)| !tree.is_empty())
            .collect();

        if children.is_empty() {
            return self.messages.serialize(serializer);
        }

        let own = usize::from(!self.messages.is_empty());
        let mut map = serializer.serialize_map(Some(children.len() + own))?;
        if own == 1 {
            map.serialize_entry(OWN_ERRORS_KEY, &self.messages)?;
        }
        for (key, subtree) in children {
            map.serialize_entry(key, subtree)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.flatten();
        for (idx, (path, message)) in entries.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            if path.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{path}: {message}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // Repeated messages on one node collapse to a single entry.
    #[test]
    fn push_deduplicates_messages() {
        let mut tree = ErrorTree::new();
        tree.push_field("color", "expected string");
        tree.push_field("color", "expected string");
        tree.push_field("color", "too long");
        assert_eq!(
            tree.get("color").unwrap().messages(),
            &["expected string".to_string(), "too long".to_string()]
        );
    }

    // Leaf nodes serialize as arrays and inner nodes as objects.
    #[test]
    fn serializes_leaves_as_arrays_and_nodes_as_objects() {
        let mut tree = ErrorTree::new();
        tree.push_field("a1", "attribute required");
        tree.push_path(["a2", "variants", "0", "hexCode"], "invalid hex color code");
        assert_eq!(
            tree.to_json(),
            json!({
                "a1": ["attribute required"],
                "a2": { "variants": { "0": { "hexCode": ["invalid hex color code"] } } }
            })
        );
    }

    // Own messages move under `_errors` once a node also has children.
    #[test]
    fn mixed_nodes_keep_own_messages_under_errors_key() {
        let mut tree = ErrorTree::new();
        tree.push("exactly one of create, update or delete must be provided");
        tree.push_path(["create", "0", "name"], "name required");
        assert_eq!(
            tree.to_json(),
            json!({
                "_errors": ["exactly one of create, update or delete must be provided"],
                "create": { "0": { "name": ["name required"] } }
            })
        );
    }

    // Inserting an empty subtree leaves no trace.
    #[test]
    fn insert_ignores_empty_subtrees() {
        let mut tree = ErrorTree::new();
        tree.insert("a1", ErrorTree::new());
        assert!(tree.is_empty());
        assert_eq!(tree.to_json(), json!([]));
        assert_eq!(tree.keys().count(), 0);
    }

    // Flattened output uses dotted paths and Display joins them.
    #[test]
    fn flatten_and_display_use_dotted_paths() {
        let mut tree = ErrorTree::new();
        tree.push_path(["a1", "value"], "must be less than or equal to 16");
        assert_eq!(
            tree.flatten(),
            vec![(
                "a1.value".to_string(),
                "must be less than or equal to 16".to_string()
            )]
        );
        assert_eq!(tree.to_string(), "a1.value: must be less than or equal to 16");
        assert_eq!(tree.message_count(), 1);
        assert!(tree.at(&["a1", "value"]).is_some());
        assert!(tree.at(&["a1", "variants"]).is_none());
    }

    // Merging combines messages and children from both trees.
    #[test]
    fn merge_combines_both_trees() {
        let mut left = ErrorTree::with_message("top");
        left.push_field("x", "one");
        let mut right = ErrorTree::with_message("top");
        right.push_field("x", "two");
        right.push_field("y", "three");
        left.merge(right);
        assert_eq!(left.messages(), &["top".to_string()]);
        assert_eq!(left.get("x").unwrap().messages().len(), 2);
        assert_eq!(left.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert!(left.into_result(()).is_err());
        assert_eq!(ErrorTree::new().into_result(5), Ok(5));
    }
}
