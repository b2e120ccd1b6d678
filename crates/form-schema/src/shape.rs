//! Shape guides: which error-tree locations are terminal and which nest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::SchemaNode;

/// The structural part of a schema as the error mapper sees it.
///
/// A key present in the map nests further; a field with no key here is
/// terminal and holds a message list. Array and record elements share the
/// shape of their element type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(BTreeMap<String, Shape>);

impl Shape {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Key union of `self` and `other`. On a shared key the entry from
    /// `other` replaces the one in `self` whole.
    fn merge(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl FromIterator<(String, Shape)> for Shape {
    fn from_iter<I: IntoIterator<Item = (String, Shape)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Shape of a schema node, or `None` when the node is terminal.
///
/// Wrappers are transparent. Objects keep only their non-terminal fields.
/// Arrays and records take the shape of their element, or an empty shape
/// when the element is terminal. Unions take the key union of their
/// branches, later branches winning on a shared key; since a terminal field
/// has no key, a nested branch always wins over a terminal one.
#[must_use]
pub fn build_shape(node: &SchemaNode) -> Option<Shape> {
    match node.unwrapped().node {
        SchemaNode::Object(fields) => Some(
            fields
                .iter()
                .filter_map(|(key, field)| build_shape(field).map(|shape| (key.clone(), shape)))
                .collect(),
        ),
        SchemaNode::Array(element) | SchemaNode::Record(element) => {
            Some(build_shape(element).unwrap_or_default())
        }
        SchemaNode::Union(branches) => branches
            .iter()
            .filter_map(build_shape)
            .fold(None, |merged: Option<Shape>, next| {
                Some(merged.unwrap_or_default().merge(next))
            }),
        _ => None,
    }
}
