//! Named schema registry.
//!
//! The `SchemaRegistry` keeps compiled [`Schema`]s by name so shape guides
//! and defaults are derived once per schema and shared by every form that
//! uses it.

use std::collections::HashMap;

use form_core::Value;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::validated::{ValidateFormOptions, Validated, validate_form_sync};
use crate::validator::Validator;

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a compiled schema under its id, replacing and returning any
    /// schema previously registered under that id.
    pub fn register(&mut self, schema: Schema) -> Option<Schema> {
        debug!(schema = schema.id(), "registering schema");
        self.schemas.insert(schema.id().to_string(), schema)
    }

    /// Compile and register a JSON Schema document.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Schema::compile`].
    pub fn register_document(&mut self, name: &str, document: JsonValue) -> Result<&Schema, SchemaError> {
        let schema = Schema::compile(name, document)?;
        self.register(schema);
        self.get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))
    }

    /// Get a schema by name. Returns `None` if not found.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Validate form data against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotFound` if the schema name is unknown, or any
    /// validator failure.
    pub fn validate(
        &self,
        name: &str,
        data: Option<&Value>,
        options: &ValidateFormOptions,
    ) -> Result<Validated, SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_string()))?;
        validate_form_sync(schema, data, options)
    }

    /// List all registered schema names.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered schemas.
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
