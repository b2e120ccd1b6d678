//! The dynamically shaped data tree.
//!
//! A [`Value`] is either a composite node (object or array) or an opaque leaf.
//! Dates and sets are leaves with type-aware equality: dates compare by
//! instant, sets compare as unordered collections.
//!
//! `Undefined` is a real value, distinct from a missing key. The error and
//! taint trees rely on that: a key holding `Undefined` means "was set, then
//! cleared", while a missing key means "never set".

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::path::{Segment, parse_index};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Set(Vec<Value>),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// An empty object node.
    #[must_use]
    pub const fn object() -> Self {
        Self::Object(BTreeMap::new())
    }

    /// A set leaf. Duplicate members are dropped.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Self>) -> Self {
        let mut members: Vec<Self> = Vec::new();
        for item in items {
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Self::Set(members)
    }

    /// An array of string leaves, the representation of a message list.
    #[must_use]
    pub fn strings<S: Into<String>>(items: impl IntoIterator<Item = S>) -> Self {
        Self::Array(items.into_iter().map(|s| Self::String(s.into())).collect())
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Objects and arrays hold children; everything else is a leaf.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Array(_))
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !self.is_container()
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Set(_) => "set",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<String, Self>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> Option<&Vec<Self>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Child lookup by segment.
    ///
    /// Objects accept index segments as their decimal key and arrays accept
    /// keys that spell an index, so `errors.tags[0]` and `errors.tags.0`
    /// address the same node. Leaves have no children.
    #[must_use]
    pub fn get(&self, segment: &Segment) -> Option<&Self> {
        match (self, segment) {
            (Self::Object(map), Segment::Key(key)) => map.get(key),
            (Self::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
            (Self::Array(items), Segment::Index(index)) => items.get(*index),
            (Self::Array(items), Segment::Key(key)) => parse_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, segment: &Segment) -> Option<&mut Self> {
        match (self, segment) {
            (Self::Object(map), Segment::Key(key)) => map.get_mut(key),
            (Self::Object(map), Segment::Index(index)) => map.get_mut(&index.to_string()),
            (Self::Array(items), Segment::Index(index)) => items.get_mut(*index),
            (Self::Array(items), Segment::Key(key)) => {
                parse_index(key).and_then(|i| items.get_mut(i))
            }
            _ => None,
        }
    }

    /// Write a child in place. Arrays grow with `Undefined` holes when the
    /// index is past the end. Returns `false` when `self` cannot hold the
    /// segment (a leaf, or a non-numeric key on an array).
    pub fn insert(&mut self, segment: &Segment, value: Self) -> bool {
        match (self, segment) {
            (Self::Object(map), Segment::Key(key)) => {
                map.insert(key.clone(), value);
                true
            }
            (Self::Object(map), Segment::Index(index)) => {
                map.insert(index.to_string(), value);
                true
            }
            (Self::Array(items), Segment::Index(index)) => {
                put_at(items, *index, value);
                true
            }
            (Self::Array(items), Segment::Key(key)) => match parse_index(key) {
                Some(index) => {
                    put_at(items, index, value);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Children of a composite node in natural order: sorted keys for
    /// objects, ascending indices for arrays. Leaves have none.
    #[must_use]
    pub fn entries(&self) -> Vec<(Segment, &Self)> {
        match self {
            Self::Object(map) => map
                .iter()
                .map(|(key, value)| (Segment::Key(key.clone()), value))
                .collect(),
            Self::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, value)| (Segment::Index(index), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Follow `path` without any callbacks. The empty path is `self`.
    #[must_use]
    pub fn pointer(&self, path: &[Segment]) -> Option<&Self> {
        path.iter().try_fold(self, |node, segment| node.get(segment))
    }

    /// Lossy conversion to JSON: undefined object entries are omitted,
    /// undefined array items and non-finite numbers become `null`, dates
    /// become RFC 3339 strings, and sets become arrays.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Undefined | Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Number(n) => number_to_json(*n),
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Date(date) => JsonValue::String(date.to_rfc3339()),
            Self::Set(items) | Self::Array(items) => {
                JsonValue::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(map) => JsonValue::Object(
                map.iter()
                    .filter(|(_, value)| !value.is_undefined())
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn put_at(items: &mut Vec<Value>, index: usize, value: Value) {
    if index >= items.len() {
        items.resize(index + 1, Value::Undefined);
    }
    items[index] = value;
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        return JsonValue::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            // NaN equals itself here so that a tree always equals itself.
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a.len() == b.len() && a.iter().all(|x| b.contains(x)),
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Self::String(s),
            JsonValue::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(value: Vec<Self>) -> Self {
        Self::Array(value)
    }
}

impl FromIterator<(String, Self)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Self)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().collect())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Self::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}
