//! Whole-form validation.

use std::collections::BTreeMap;

use form_core::{CoreError, ErrorTree, Path, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SchemaError;
use crate::mapper::map_native_errors;
use crate::validator::{Validation, Validator};

/// A validated form as handed to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validated {
    pub id: String,
    pub valid: bool,
    pub posted: bool,
    pub errors: ErrorTree,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Validated {
    /// Add messages at `path`, or at form level when `path` is `None`, and
    /// mark the form invalid. Server-side checks that run after schema
    /// validation report through here.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAField` when the path passes through a
    /// message list; the form is left untouched.
    pub fn set_error(&mut self, path: Option<&Path>, messages: Vec<String>, overwrite: bool) -> Result<(), CoreError> {
        self.errors.set_error(path, messages, overwrite)?;
        self.valid = false;
        Ok(())
    }

    /// Attach a status message for the client.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateFormOptions {
    /// Form id; defaults to the validator id.
    pub id: Option<String>,
    /// `Some(true)` reports errors even for absent data, `Some(false)`
    /// never reports them, `None` reports them for submitted data only.
    pub errors: Option<bool>,
    /// Whether the data came from a submission.
    pub posted: bool,
}

/// Validate `data` against `validator`, or the schema defaults when `data`
/// is `None`.
///
/// Absent data is only run through the validator when the schema has
/// effects or errors were requested. Rejected data keeps the submitted
/// value of every schema field and takes defaults for the rest.
///
/// # Errors
///
/// Propagates validator failures.
pub async fn validate_form<V: Validator>(
    validator: &V,
    data: Option<&Value>,
    options: &ValidateFormOptions,
) -> Result<Validated, SchemaError> {
    let result = match input(validator, data, options) {
        Some(input) => Some(validator.parse_async(&input).await?),
        None => None,
    };
    Ok(assemble(validator, data, options, result))
}

/// Blocking counterpart of [`validate_form`].
///
/// # Errors
///
/// Propagates validator failures.
pub fn validate_form_sync<V: Validator>(
    validator: &V,
    data: Option<&Value>,
    options: &ValidateFormOptions,
) -> Result<Validated, SchemaError> {
    let result = input(validator, data, options)
        .map(|input| validator.parse(&input))
        .transpose()?;
    Ok(assemble(validator, data, options, result))
}

fn input<V: Validator>(validator: &V, data: Option<&Value>, options: &ValidateFormOptions) -> Option<Value> {
    match data {
        Some(data) => Some(data.clone()),
        None if validator.has_effects() || options.errors == Some(true) => {
            Some(validator.default_value().clone())
        }
        None => None,
    }
}

fn assemble<V: Validator>(
    validator: &V,
    data: Option<&Value>,
    options: &ValidateFormOptions,
    result: Option<Validation>,
) -> Validated {
    let id = options
        .id
        .clone()
        .unwrap_or_else(|| validator.id().to_string());
    let defaults = validator.default_value();

    let (valid, errors, data) = match (data, result) {
        (_, Some(Validation::Valid(parsed))) => (true, ErrorTree::new(), parsed),
        (None, Some(Validation::Invalid(native))) => {
            let errors = if options.errors == Some(true) {
                map_native_errors(&native, validator.shape())
            } else {
                ErrorTree::new()
            };
            (false, errors, defaults.clone())
        }
        (None, None) => (false, ErrorTree::new(), defaults.clone()),
        (Some(submitted), rejected) => {
            let errors = match rejected {
                Some(Validation::Invalid(native)) if options.errors != Some(false) => {
                    map_native_errors(&native, validator.shape())
                }
                _ => ErrorTree::new(),
            };
            (false, errors, schema_fields(validator, submitted, defaults))
        }
    };

    debug!(form = %id, valid, posted = options.posted, "validated form");
    Validated {
        id,
        valid,
        posted: options.posted,
        errors,
        data,
        message: None,
    }
}

/// One entry per schema field: the submitted value when present, the
/// default otherwise. Keys the schema does not know are dropped.
fn schema_fields<V: Validator>(validator: &V, submitted: &Value, defaults: &Value) -> Value {
    let Some(fields) = validator.node().fields() else {
        return submitted.clone();
    };
    let data: BTreeMap<String, Value> = fields
        .keys()
        .map(|key| {
            let value = submitted
                .as_object()
                .and_then(|given| given.get(key))
                .or_else(|| defaults.as_object().and_then(|d| d.get(key)))
                .cloned()
                .unwrap_or_default();
            (key.clone(), value)
        })
        .collect();
    Value::Object(data)
}
