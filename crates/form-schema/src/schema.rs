//! JSON Schema backed validator.
//!
//! A [`Schema`] compiles a JSON Schema document twice: once into a
//! `jsonschema` validator that produces the error messages, and once into
//! the [`SchemaNode`] structure the path engine reads. Shape guide and
//! defaults are derived on first use and cached for the schema's lifetime.

use std::fmt;
use std::sync::OnceLock;

use form_core::{Path, Value};
use jsonschema::error::ValidationErrorKind;
use schemars::{JsonSchema, schema_for};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::dates::{calendar_text, coerce_dates};
use crate::defaults::{default_value, with_defaults};
use crate::error::SchemaError;
use crate::native::NativeErrors;
use crate::node::SchemaNode;
use crate::shape::{Shape, build_shape};
use crate::validator::{Validation, Validator};

pub struct Schema {
    id: String,
    document: JsonValue,
    node: SchemaNode,
    validator: jsonschema::Validator,
    shape: OnceLock<Shape>,
    defaults: OnceLock<Value>,
}

impl Schema {
    /// Compile a JSON Schema document whose root describes an object.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Unsupported` for non-object roots or
    /// constructs with no structural meaning, `SchemaError::RecursiveRef`
    /// for self-referencing schemas, and `SchemaError::Compile` when the
    /// document is not a valid JSON Schema.
    pub fn compile(id: impl Into<String>, document: JsonValue) -> Result<Self, SchemaError> {
        let id = id.into();
        let node = SchemaNode::from_json_schema(&document)?;
        let Some(fields) = node.fields() else {
            return Err(SchemaError::unsupported("#", "form schemas must have an object root"));
        };
        let field_count = fields.len();

        let validator =
            jsonschema::validator_for(&document).map_err(|e| SchemaError::Compile(format!("{e}")))?;

        debug!(schema = %id, fields = field_count, "compiled schema");
        Ok(Self {
            id,
            document,
            node,
            validator,
            shape: OnceLock::new(),
            defaults: OnceLock::new(),
        })
    }

    /// Compile the schema `schemars` derives for `T`, named after `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Schema::compile`].
    pub fn for_type<T: JsonSchema>() -> Result<Self, SchemaError> {
        let document =
            serde_json::to_value(schema_for!(T)).map_err(|e| SchemaError::Compile(format!("{e}")))?;
        Self::compile(T::schema_name(), document)
    }

    #[must_use]
    pub const fn document(&self) -> &JsonValue {
        &self.document
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl Validator for Schema {
    fn id(&self) -> &str {
        &self.id
    }

    fn node(&self) -> &SchemaNode {
        &self.node
    }

    fn shape(&self) -> &Shape {
        self.shape
            .get_or_init(|| build_shape(&self.node).unwrap_or_default())
    }

    fn default_value(&self) -> &Value {
        self.defaults.get_or_init(|| default_value(&self.node))
    }

    fn parse(&self, data: &Value) -> Result<Validation, SchemaError> {
        let instance = calendar_text(data, &self.node).to_json();
        let issues: Vec<(Path, String)> = self
            .validator
            .iter_errors(&instance)
            .map(|error| {
                let mut path = Path::from_json_pointer(&error.instance_path.to_string());
                // A missing property is reported on its parent; attribute it
                // to the property so the message lands on the field.
                if let ValidationErrorKind::Required { property } = &error.kind {
                    if let Some(name) = property.as_str() {
                        path.push(name);
                    }
                }
                (path, error.to_string())
            })
            .collect();

        if issues.is_empty() {
            let data = coerce_dates(data, &self.node);
            return Ok(Validation::Valid(with_defaults(&data, self.default_value())));
        }
        debug!(schema = %self.id, issues = issues.len(), "validation rejected data");
        Ok(Validation::Invalid(NativeErrors::from_issues(issues)))
    }
}
