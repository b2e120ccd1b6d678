//! The canonical error tree.
//!
//! Mirrors the data tree. A field's error is a message list (an array of
//! strings) at the field's path; a node may also carry messages that apply
//! to it as a whole under the reserved [`FORM_ERRORS_KEY`]. A key holding
//! `Undefined` means the error was cleared, which is different from a key
//! that was never written.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::path::{Path, Segment};
use crate::traversal::{Descend, Visit, descend_mut, set_paths, walk_mut};
use crate::value::Value;

/// Key holding node-level (aggregate) messages.
pub const FORM_ERRORS_KEY: &str = "_errors";

/// One entry of a flattened error tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatError {
    pub path: String,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClearOptions<'a> {
    /// Also clear the root `_errors` list.
    pub clear_form_level_errors: bool,
    /// A path forced to `Undefined` after clearing, even if it was not a
    /// message list.
    pub undefine_path: Option<&'a Path>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTree(Value);

impl Default for ErrorTree {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Value> for ErrorTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(_) => Self(value),
            _ => Self::new(),
        }
    }
}

/// The messages of a message-list node.
fn message_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn is_message_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| !items.is_empty() && items.iter().all(|i| i.as_str().is_some()))
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self(Value::object())
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// The message list at `path`, if the node there is one.
    #[must_use]
    pub fn messages(&self, path: &[Segment]) -> Option<Vec<String>> {
        self.0.pointer(path).and_then(message_list)
    }

    /// Whether `path` holds a non-empty message list.
    #[must_use]
    pub fn has_messages(&self, path: &[Segment]) -> bool {
        self.messages(path).is_some_and(|m| !m.is_empty())
    }

    /// The node at `path` when its key is present, cleared entries
    /// included.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAField` when the path passes through a
    /// message list.
    pub fn entry(&self, path: &[Segment]) -> Result<Option<&Value>, CoreError> {
        let mut node = &self.0;
        for (depth, segment) in path.iter().enumerate() {
            if depth > 0 && is_message_list(node) {
                return Err(CoreError::NotAField {
                    path: Path::from(path).to_string(),
                });
            }
            match node.get(segment) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok(Some(node))
    }

    /// The ancestor of `path` holding a message list that `path` runs
    /// through, if any. That ancestor is the field the path belongs to as
    /// far as errors are concerned.
    #[must_use]
    pub fn enclosing_field(&self, path: &[Segment]) -> Option<Path> {
        let mut node = &self.0;
        for (depth, segment) in path.iter().enumerate() {
            if depth > 0 && is_message_list(node) {
                return Some(Path::from(&path[..depth]));
            }
            node = node.get(segment)?;
        }
        None
    }

    /// Whether the key at `path` exists, even if its error was cleared.
    #[must_use]
    pub fn has_entry(&self, path: &[Segment]) -> bool {
        !path.is_empty() && matches!(self.entry(path), Ok(Some(_)))
    }

    /// Write (or clear, with `None`) the message list at `path`, creating
    /// intermediate nodes. The empty path addresses the form-level list.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAField` when the path passes through a
    /// message list.
    pub fn set_messages(&mut self, path: &[Segment], messages: Option<Vec<String>>) -> Result<(), CoreError> {
        let value = messages.map_or(Value::Undefined, Value::strings);
        self.write(path, |_| value)
    }

    fn write<F>(&mut self, path: &[Segment], compute: F) -> Result<(), CoreError>
    where
        F: FnOnce(Option<&Value>) -> Value,
    {
        let form_level = [Segment::key(FORM_ERRORS_KEY)];
        let path = if path.is_empty() { &form_level[..] } else { path };

        let mut blocked = false;
        let leaf = descend_mut(&mut self.0, path, |node| match node.value {
            Some(existing) if is_message_list(existing) => {
                blocked = true;
                Descend::Stop
            }
            Some(Value::Object(_)) => Descend::Into,
            _ => Descend::Replace(Value::object()),
        });

        match leaf {
            Some(mut leaf) => {
                let next = compute(leaf.value());
                leaf.set(next);
                Ok(())
            }
            None if blocked => Err(CoreError::NotAField {
                path: Path::from(path).to_string(),
            }),
            // Only reachable if the root stopped being an object.
            None => Ok(()),
        }
    }

    /// Form-level messages (the root `_errors` list).
    #[must_use]
    pub fn form_errors(&self) -> Vec<String> {
        self.messages(&[Segment::key(FORM_ERRORS_KEY)])
            .unwrap_or_default()
    }

    /// Add messages at `path`, or at form level when `path` is `None`.
    /// Existing messages are kept and the new ones appended unless
    /// `overwrite` is set.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAField` when the path passes through a
    /// message list.
    pub fn set_error(&mut self, path: Option<&Path>, messages: Vec<String>, overwrite: bool) -> Result<(), CoreError> {
        let path = path.map_or(&[][..], |p| p.segments());
        self.write(path, |existing| match existing.and_then(message_list) {
            Some(mut current) if !overwrite => {
                current.extend(messages);
                Value::strings(current)
            }
            _ => Value::strings(messages),
        })
    }

    /// Every non-empty message list with its path, depth first. Numeric
    /// keys are written as indices (`tags[0]`).
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatError> {
        let mut out = Vec::new();
        let mut path = Path::root();
        flatten_into(&self.0, &mut path, &mut out);
        out
    }

    /// Reset every message list to `Undefined`. Keys stay in place so a
    /// cleared error remains distinguishable from one never set. The root
    /// `_errors` list survives unless `clear_form_level_errors` is set.
    pub fn clear(&mut self, options: &ClearOptions<'_>) {
        walk_mut(&mut self.0, |path, value| {
            if !options.clear_form_level_errors
                && matches!(path, [Segment::Key(key)] if key == FORM_ERRORS_KEY)
            {
                return Visit::Skip;
            }
            if matches!(value, Value::Array(_)) {
                *value = Value::Undefined;
                return Visit::Skip;
            }
            Visit::Continue
        });
        if let Some(path) = options.undefine_path {
            set_paths(&mut self.0, [path], &Value::Undefined);
        }
    }

    /// Set every `_errors` list in the tree, at any depth, to `Undefined`.
    pub fn clear_aggregates(&mut self) {
        walk_mut(&mut self.0, |path, value| {
            if matches!(path.last(), Some(Segment::Key(key)) if key == FORM_ERRORS_KEY) {
                *value = Value::Undefined;
                return Visit::Skip;
            }
            Visit::Continue
        });
    }

    /// No message anywhere in the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flatten().is_empty()
    }

    /// Top-level keys, for merging a partial result into a live tree.
    #[must_use]
    pub fn top_level(&self) -> Vec<(String, &Value)> {
        self.0
            .as_object()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v)).collect())
            .unwrap_or_default()
    }

    /// Overwrite one top-level key.
    pub fn set_top_level(&mut self, key: impl Into<String>, value: Value) {
        if let Some(map) = self.0.as_object_mut() {
            map.insert(key.into(), value);
        }
    }
}

fn flatten_into(node: &Value, path: &mut Path, out: &mut Vec<FlatError>) {
    for (segment, value) in node.entries() {
        if value.is_undefined() {
            continue;
        }
        path.push(segment);
        match message_list(value) {
            Some(messages) if !messages.is_empty() => out.push(FlatError {
                path: path.merged(),
                messages,
            }),
            _ => flatten_into(value, path, out),
        }
        path.pop();
    }
}
