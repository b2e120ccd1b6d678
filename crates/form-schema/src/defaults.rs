//! Default instances for schemas.

use form_core::Value;

use crate::node::{LeafKind, SchemaNode};

/// A concrete default for `node` and, for objects, for every field.
///
/// An explicit `default` wins, then `null` for nullable nodes, then
/// `Undefined` for optional ones. Otherwise strings default to `""`,
/// numbers to `0`, booleans to `false`, arrays to `[]`, records to `{}`,
/// enums to their first member and literals to themselves. Dates and
/// untyped leaves have no default and stay `Undefined`. A union defaults
/// like its first branch.
#[must_use]
pub fn default_value(node: &SchemaNode) -> Value {
    let info = node.unwrapped();
    if let Some(value) = info.default {
        return value.clone();
    }
    if info.nullable {
        return Value::Null;
    }
    if info.optional {
        return Value::Undefined;
    }

    match info.node {
        SchemaNode::Object(fields) => fields
            .iter()
            .map(|(key, field)| (key.clone(), default_value(field)))
            .collect(),
        SchemaNode::Array(_) => Value::Array(Vec::new()),
        SchemaNode::Record(_) => Value::object(),
        SchemaNode::Union(branches) => branches.first().map_or(Value::Undefined, default_value),
        SchemaNode::Leaf(kind) => match kind {
            LeafKind::String => Value::from(""),
            LeafKind::Number | LeafKind::Integer => Value::from(0),
            LeafKind::Boolean => Value::Bool(false),
            LeafKind::Null => Value::Null,
            LeafKind::Enum(members) => members.first().cloned().unwrap_or_default(),
            LeafKind::Literal(value) => value.clone(),
            LeafKind::Date | LeafKind::CalendarDate | LeafKind::Any => Value::Undefined,
        },
        // Wrappers were peeled by `unwrapped`.
        SchemaNode::Optional(_)
        | SchemaNode::Nullable(_)
        | SchemaNode::Default { .. }
        | SchemaNode::Effects(_) => Value::Undefined,
    }
}

/// `data` with every key it lacks filled in from `defaults`, recursively
/// through objects present on both sides.
#[must_use]
pub fn with_defaults(data: &Value, defaults: &Value) -> Value {
    match (data, defaults) {
        (Value::Object(given), Value::Object(fallback)) => {
            let mut merged = given.clone();
            for (key, default) in fallback {
                match merged.get_mut(key) {
                    Some(existing) => *existing = with_defaults(existing, default),
                    None => {
                        merged.insert(key.clone(), default.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ => data.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn defaults_of(doc: serde_json::Value) -> Value {
        default_value(&SchemaNode::from_json_schema(&doc).unwrap())
    }

    #[test]
    fn field_defaults_follow_type() {
        let value = defaults_of(json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "age": {"type": "integer"},
                "agree": {"type": "boolean"},
                "tags": {"type": "array", "items": {"type": "string"}},
                "role": {"enum": ["admin", "user"]},
                "kind": {"const": "person"},
                "extra": {"type": "object", "additionalProperties": {"type": "string"}},
            },
            "required": ["name", "age", "agree", "tags", "role", "kind", "extra"],
        }));
        assert_eq!(
            value,
            Value::from(json!({
                "name": "",
                "age": 0,
                "agree": false,
                "tags": [],
                "role": "admin",
                "kind": "person",
                "extra": {},
            }))
        );
    }

    #[test]
    fn wrappers_decide_before_type() {
        let value = defaults_of(json!({
            "type": "object",
            "properties": {
                "nickname": {"type": "string"},
                "score": {"type": ["number", "null"]},
                "level": {"type": "integer", "default": 3},
                "born": {"type": "string", "format": "date"},
            },
            "required": ["score", "level", "born"],
        }));
        let fields = value.as_object().unwrap();
        assert_eq!(fields["nickname"], Value::Undefined);
        assert_eq!(fields["score"], Value::Null);
        assert_eq!(fields["level"], Value::from(3));
        assert_eq!(fields["born"], Value::Undefined);
    }

    #[test]
    fn with_defaults_fills_missing_keys_only() {
        let defaults = Value::from(json!({"name": "", "address": {"city": "", "zip": ""}}));
        let data = Value::from(json!({"address": {"city": "Oslo"}, "extra": 1}));
        assert_eq!(
            with_defaults(&data, &defaults),
            Value::from(json!({"name": "", "address": {"city": "Oslo", "zip": ""}, "extra": 1}))
        );
    }
}
