//! Schema and validation error types.

use form_core::CoreError;
use thiserror::Error;

/// Errors from compiling schemas and running validators.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    NotFound(String),

    /// The JSON Schema document could not be compiled into a validator.
    #[error("Schema compilation error: {0}")]
    Compile(String),

    /// The document uses a construct that has no structural meaning for a form.
    #[error("Unsupported schema at '{pointer}': {reason}")]
    Unsupported { pointer: String, reason: String },

    /// A `$ref` refers back to one of its own ancestors.
    #[error("Recursive schema reference: {0}")]
    RecursiveRef(String),

    /// The validator itself failed, as opposed to rejecting the data.
    #[error("Validator failure: {0}")]
    ValidatorFailure(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl SchemaError {
    pub(crate) fn unsupported(pointer: &str, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            pointer: pointer.to_string(),
            reason: reason.into(),
        }
    }
}
