//! The validator's own nested error tree.

use std::collections::BTreeMap;

use form_core::{Path, Segment};
use serde::{Deserialize, Serialize};

/// Validator output before it is mapped onto the data shape.
///
/// Every node carries the messages that apply to it and its children by
/// key; array elements use their decimal index as key. Serializes as
/// `{"_errors": [...], "<key>": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeErrors {
    #[serde(rename = "_errors", default)]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub children: BTreeMap<String, NativeErrors>,
}

impl NativeErrors {
    /// Collect `(location, message)` issues into a tree.
    pub fn from_issues<I, M>(issues: I) -> Self
    where
        I: IntoIterator<Item = (Path, M)>,
        M: Into<String>,
    {
        let mut tree = Self::default();
        for (path, message) in issues {
            tree.push(&path, message);
        }
        tree
    }

    /// Record `message` at `path`, creating nodes along the way.
    pub fn push(&mut self, path: &[Segment], message: impl Into<String>) {
        let mut node = self;
        for segment in path {
            let key = match segment {
                Segment::Key(key) => key.clone(),
                Segment::Index(index) => index.to_string(),
            };
            node = node.children.entry(key).or_default();
        }
        node.errors.push(message.into());
    }

    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        self.children.get(key)
    }

    /// Any message anywhere in the tree.
    #[must_use]
    pub fn has_messages(&self) -> bool {
        !self.errors.is_empty() || self.children.values().any(Self::has_messages)
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.errors.len() + self.children.values().map(Self::message_count).sum::<usize>()
    }

    /// Every message in the tree, depth first.
    #[must_use]
    pub fn all_messages(&self) -> Vec<String> {
        let mut out = self.errors.clone();
        for child in self.children.values() {
            out.extend(child.all_messages());
        }
        out
    }
}
