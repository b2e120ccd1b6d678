//! Structural description of a schema.
//!
//! [`SchemaNode`] keeps only what the path engine needs from a schema: which
//! nodes are objects, arrays, records, unions or leaves, and which wrappers
//! (optional, nullable, default, side effects) sit around them. It is built
//! from a JSON Schema document by [`SchemaNode::from_json_schema`].

use std::collections::{BTreeMap, HashSet};

use form_core::Value;
use serde_json::{Map, Value as JsonValue};

use crate::error::SchemaError;

/// Keywords that add cross-field or conditional checks on top of the
/// structure. A node carrying any of them is wrapped in `Effects`.
const EFFECT_KEYWORDS: &[&str] = &["if", "not", "dependentRequired", "dependentSchemas", "dependencies"];

#[derive(Debug, Clone, PartialEq)]
pub enum LeafKind {
    String,
    Number,
    Integer,
    Boolean,
    /// `format: "date-time"`, an instant.
    Date,
    /// `format: "date"`, a day with no time.
    CalendarDate,
    Null,
    Enum(Vec<Value>),
    Literal(Value),
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object(BTreeMap<String, SchemaNode>),
    Array(Box<SchemaNode>),
    /// A keyed collection: every value shares one schema.
    Record(Box<SchemaNode>),
    Union(Vec<SchemaNode>),
    Optional(Box<SchemaNode>),
    Nullable(Box<SchemaNode>),
    Default { inner: Box<SchemaNode>, value: Value },
    Effects(Box<SchemaNode>),
    Leaf(LeafKind),
}

/// A node with its wrapper layers peeled off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeInfo<'a> {
    pub node: &'a SchemaNode,
    pub optional: bool,
    pub nullable: bool,
    /// The outermost default, if any wrapper declared one.
    pub default: Option<&'a Value>,
    pub effects: bool,
}

impl SchemaNode {
    /// Peel optional, nullable, default and effects wrappers.
    #[must_use]
    pub fn unwrapped(&self) -> TypeInfo<'_> {
        let mut info = TypeInfo {
            node: self,
            optional: false,
            nullable: false,
            default: None,
            effects: false,
        };
        loop {
            match info.node {
                Self::Optional(inner) => {
                    info.optional = true;
                    info.node = &**inner;
                }
                Self::Nullable(inner) => {
                    info.nullable = true;
                    info.node = &**inner;
                }
                Self::Default { inner, value } => {
                    info.default = info.default.or(Some(value));
                    info.node = &**inner;
                }
                Self::Effects(inner) => {
                    info.effects = true;
                    info.node = &**inner;
                }
                _ => return info,
            }
        }
    }

    /// Fields of the underlying object, if this is one.
    #[must_use]
    pub fn fields(&self) -> Option<&BTreeMap<String, Self>> {
        match self.unwrapped().node {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Build the structural description of a JSON Schema document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::RecursiveRef` when a `$ref` points back at one of
    /// its ancestors, and `SchemaError::Unsupported` for malformed keywords,
    /// non-local references and `allOf` members that are not all objects.
    pub fn from_json_schema(document: &JsonValue) -> Result<Self, SchemaError> {
        let mut builder = Builder {
            document,
            refs: Vec::new(),
        };
        builder.build(document, "#")
    }
}

struct Builder<'d> {
    document: &'d JsonValue,
    /// `$ref`s currently being expanded, outermost first.
    refs: Vec<String>,
}

impl<'d> Builder<'d> {
    fn build(&mut self, schema: &'d JsonValue, pointer: &str) -> Result<SchemaNode, SchemaError> {
        let object = match schema {
            JsonValue::Bool(_) => return Ok(SchemaNode::Leaf(LeafKind::Any)),
            JsonValue::Object(map) => map,
            _ => return Err(SchemaError::unsupported(pointer, "expected a schema object")),
        };

        let (mut node, nullable) = self.structure(object, pointer)?;
        if EFFECT_KEYWORDS.iter().any(|k| object.contains_key(*k)) {
            node = SchemaNode::Effects(Box::new(node));
        }
        if nullable {
            node = SchemaNode::Nullable(Box::new(node));
        }
        if let Some(default) = object.get("default") {
            node = SchemaNode::Default {
                inner: Box::new(node),
                value: Value::from(default.clone()),
            };
        }
        Ok(node)
    }

    /// The structural node and whether `null` is also accepted.
    fn structure(
        &mut self,
        object: &'d Map<String, JsonValue>,
        pointer: &str,
    ) -> Result<(SchemaNode, bool), SchemaError> {
        if let Some(reference) = object.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| SchemaError::unsupported(pointer, "$ref must be a string"))?;
            return Ok((self.resolve(reference)?, false));
        }

        if let Some(constant) = object.get("const") {
            let leaf = if constant.is_null() {
                LeafKind::Null
            } else {
                LeafKind::Literal(Value::from(constant.clone()))
            };
            return Ok((SchemaNode::Leaf(leaf), false));
        }

        if let Some(values) = object.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| SchemaError::unsupported(pointer, "enum must be an array"))?;
            let nullable = values.iter().any(JsonValue::is_null);
            let members = values
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| Value::from(v.clone()))
                .collect();
            return Ok((SchemaNode::Leaf(LeafKind::Enum(members)), nullable));
        }

        for keyword in ["anyOf", "oneOf"] {
            if let Some(branches) = object.get(keyword) {
                return self.union(branches, &format!("{pointer}/{keyword}"));
            }
        }

        if let Some(parts) = object.get("allOf") {
            return Ok((self.intersection(parts, &format!("{pointer}/allOf"))?, false));
        }

        match object.get("type") {
            Some(JsonValue::String(name)) => Ok((self.typed(name, object, pointer)?, false)),
            Some(JsonValue::Array(names)) => {
                let names: Vec<&str> = names.iter().filter_map(JsonValue::as_str).collect();
                let nullable = names.contains(&"null");
                let mut members = names
                    .iter()
                    .filter(|name| **name != "null")
                    .map(|name| self.typed(name, object, pointer))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(match members.len() {
                    0 => (SchemaNode::Leaf(LeafKind::Null), false),
                    1 => (members.remove(0), nullable),
                    _ => (SchemaNode::Union(members), nullable),
                })
            }
            Some(_) => Err(SchemaError::unsupported(pointer, "type must be a string or an array")),
            None if object.contains_key("properties") => {
                Ok((self.typed("object", object, pointer)?, false))
            }
            None if object.contains_key("items") || object.contains_key("prefixItems") => {
                Ok((self.typed("array", object, pointer)?, false))
            }
            None => Ok((SchemaNode::Leaf(LeafKind::Any), false)),
        }
    }

    fn typed(
        &mut self,
        name: &str,
        object: &'d Map<String, JsonValue>,
        pointer: &str,
    ) -> Result<SchemaNode, SchemaError> {
        let leaf = |kind| -> Result<SchemaNode, SchemaError> { Ok(SchemaNode::Leaf(kind)) };
        match name {
            "object" => self.object(object, pointer),
            "array" => self.array(object, pointer),
            "string" => match object.get("format").and_then(JsonValue::as_str) {
                Some("date-time") => leaf(LeafKind::Date),
                Some("date") => leaf(LeafKind::CalendarDate),
                _ => leaf(LeafKind::String),
            },
            "number" => leaf(LeafKind::Number),
            "integer" => leaf(LeafKind::Integer),
            "boolean" => leaf(LeafKind::Boolean),
            "null" => leaf(LeafKind::Null),
            other => Err(SchemaError::unsupported(pointer, format!("unknown type '{other}'"))),
        }
    }

    fn object(&mut self, object: &'d Map<String, JsonValue>, pointer: &str) -> Result<SchemaNode, SchemaError> {
        let Some(properties) = object.get("properties") else {
            let values = match object.get("additionalProperties") {
                Some(schema @ JsonValue::Object(_)) => {
                    self.build(schema, &format!("{pointer}/additionalProperties"))?
                }
                _ => SchemaNode::Leaf(LeafKind::Any),
            };
            return Ok(SchemaNode::Record(Box::new(values)));
        };

        let properties = properties
            .as_object()
            .ok_or_else(|| SchemaError::unsupported(pointer, "properties must be an object"))?;
        let required: HashSet<&str> = object
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|names| names.iter().filter_map(JsonValue::as_str).collect())
            .unwrap_or_default();

        let mut fields = BTreeMap::new();
        for (key, schema) in properties {
            let node = self.build(schema, &format!("{pointer}/properties/{key}"))?;
            let node = if required.contains(key.as_str()) {
                node
            } else {
                SchemaNode::Optional(Box::new(node))
            };
            fields.insert(key.clone(), node);
        }
        Ok(SchemaNode::Object(fields))
    }

    fn array(&mut self, object: &'d Map<String, JsonValue>, pointer: &str) -> Result<SchemaNode, SchemaError> {
        let element = match (object.get("items"), object.get("prefixItems")) {
            (Some(items @ (JsonValue::Object(_) | JsonValue::Bool(_))), _) => {
                self.build(items, &format!("{pointer}/items"))?
            }
            (Some(JsonValue::Array(tuple)), _) | (_, Some(JsonValue::Array(tuple))) => {
                let mut members = Vec::with_capacity(tuple.len());
                for (index, schema) in tuple.iter().enumerate() {
                    members.push(self.build(schema, &format!("{pointer}/items/{index}"))?);
                }
                match members.len() {
                    0 => SchemaNode::Leaf(LeafKind::Any),
                    1 => members.remove(0),
                    _ => SchemaNode::Union(members),
                }
            }
            _ => SchemaNode::Leaf(LeafKind::Any),
        };
        Ok(SchemaNode::Array(Box::new(element)))
    }

    fn union(&mut self, branches: &'d JsonValue, pointer: &str) -> Result<(SchemaNode, bool), SchemaError> {
        let branches = branches
            .as_array()
            .ok_or_else(|| SchemaError::unsupported(pointer, "expected an array of schemas"))?;

        let mut nullable = false;
        let mut members = Vec::new();
        for (index, branch) in branches.iter().enumerate() {
            match self.build(branch, &format!("{pointer}/{index}"))? {
                SchemaNode::Leaf(LeafKind::Null) => nullable = true,
                node => members.push(node),
            }
        }

        Ok(match members.len() {
            0 => (SchemaNode::Leaf(LeafKind::Null), false),
            1 => (members.remove(0), nullable),
            _ => (SchemaNode::Union(members), nullable),
        })
    }

    fn intersection(&mut self, parts: &'d JsonValue, pointer: &str) -> Result<SchemaNode, SchemaError> {
        let parts = parts
            .as_array()
            .ok_or_else(|| SchemaError::unsupported(pointer, "expected an array of schemas"))?;

        let mut nodes = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            nodes.push(self.build(part, &format!("{pointer}/{index}"))?);
        }
        if nodes.len() == 1 {
            return Ok(nodes.remove(0));
        }

        let mut merged = BTreeMap::new();
        for node in &nodes {
            let fields = node
                .fields()
                .ok_or_else(|| SchemaError::unsupported(pointer, "allOf members must all be objects"))?;
            merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Ok(SchemaNode::Object(merged))
    }

    fn resolve(&mut self, reference: &str) -> Result<SchemaNode, SchemaError> {
        let target_pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| SchemaError::unsupported(reference, "only local references are supported"))?;
        if self.refs.iter().any(|r| r == reference) {
            return Err(SchemaError::RecursiveRef(reference.to_string()));
        }
        let target = self
            .document
            .pointer(target_pointer)
            .ok_or_else(|| SchemaError::unsupported(reference, "reference target not found"))?;

        self.refs.push(reference.to_string());
        let node = self.build(target, reference);
        self.refs.pop();
        node
    }
}
