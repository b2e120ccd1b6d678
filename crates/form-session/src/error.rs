//! Form session error types.

use form_core::CoreError;
use form_schema::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A top-level field holds an object while the form posts flat data.
    #[error(
        "Object found in form field \"{field}\"; set data.data_type to \"json\" to use nested data"
    )]
    NestedData { field: String },

    /// Input text that does not convert to its field's type.
    #[error("\"{text}\" is not a valid {expected} for field \"{path}\"")]
    InvalidFieldText {
        path: String,
        text: String,
        expected: &'static str,
    },

    /// The validator failed or the schema could not be used.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A path or error-tree operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
