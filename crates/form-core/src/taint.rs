//! Which fields the user has touched.
//!
//! The taint tree mirrors the data tree. A leaf holding `true` is touched;
//! a key holding `Undefined` was touched and then cleared; a missing key
//! was never touched. Touched state lives on leaves only and never rolls
//! up into a parent flag.

use serde::{Deserialize, Serialize};

use crate::path::{Path, Segment};
use crate::traversal::{path_exists, set_paths};
use crate::value::Value;

/// Tri-state taint of one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaintState {
    Untouched,
    Touched,
    Cleared,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaintTree(Value);

impl From<Value> for TaintTree {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn contains_touched(value: &Value) -> bool {
    match value {
        Value::Bool(true) => true,
        Value::Object(map) => map.values().any(contains_touched),
        Value::Array(items) => items.iter().any(contains_touched),
        _ => false,
    }
}

impl TaintTree {
    /// No taint at all.
    #[must_use]
    pub const fn new() -> Self {
        Self(Value::Undefined)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Whether any field anywhere is touched.
    #[must_use]
    pub fn is_tainted(&self) -> bool {
        contains_touched(&self.0)
    }

    /// Whether the node at `path`, or anything below it, is touched.
    #[must_use]
    pub fn is_path_tainted(&self, path: &[Segment]) -> bool {
        self.0.pointer(path).is_some_and(contains_touched)
    }

    #[must_use]
    pub fn state(&self, path: &[Segment]) -> TaintState {
        match self.0.pointer(path) {
            Some(Value::Undefined) => TaintState::Cleared,
            Some(value) if contains_touched(value) => TaintState::Touched,
            _ => TaintState::Untouched,
        }
    }

    /// Mark every path touched, creating intermediate nodes.
    pub fn taint<'p, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'p Path>,
    {
        if !matches!(self.0, Value::Object(_)) {
            self.0 = Value::object();
        }
        set_paths(&mut self.0, paths, &Value::Bool(true));
    }

    /// Clear the taint of every path that is already present in the tree.
    /// Paths never touched are left alone. Returns the paths cleared.
    pub fn untaint<'p, I>(&mut self, paths: I) -> Vec<Path>
    where
        I: IntoIterator<Item = &'p Path>,
    {
        let present: Vec<Path> = paths
            .into_iter()
            .filter(|path| path_exists(&self.0, path).is_some_and(|leaf| leaf.value.is_some()))
            .cloned()
            .collect();
        set_paths(&mut self.0, &present, &Value::Undefined);
        present
    }

    pub fn untaint_all(&mut self) {
        self.0 = Value::Undefined;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn starts_untouched() {
        let taint = TaintTree::new();
        assert!(!taint.is_tainted());
        assert_eq!(taint.state(&path("name")), TaintState::Untouched);
    }

    #[test]
    fn taint_marks_leaves() {
        let mut taint = TaintTree::new();
        taint.taint([&path("name"), &path("address.city")]);
        assert_eq!(
            taint.as_value(),
            &Value::from(json!({"name": true, "address": {"city": true}}))
        );
        assert!(taint.is_tainted());
        assert!(taint.is_path_tainted(&path("address")));
        assert_eq!(taint.state(&path("address.city")), TaintState::Touched);
    }

    #[test]
    fn untaint_only_touches_present_paths() {
        let mut taint = TaintTree::new();
        taint.taint([&path("name")]);
        let cleared = taint.untaint([&path("name"), &path("age"), &path("address.city")]);

        assert_eq!(cleared, vec![path("name")]);
        assert_eq!(taint.state(&path("name")), TaintState::Cleared);
        assert_eq!(taint.state(&path("age")), TaintState::Untouched);
        assert!(!taint.is_tainted());
        assert!(taint.as_value().pointer(&path("address")).is_none());
    }

    #[test]
    fn untaint_all_resets() {
        let mut taint = TaintTree::new();
        taint.taint([&path("tags[0]")]);
        taint.untaint_all();
        assert_eq!(taint, TaintTree::new());
    }
}
