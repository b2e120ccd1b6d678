//! The validator contract.

use std::future::Future;

use form_core::Value;

use crate::error::SchemaError;
use crate::native::NativeErrors;
use crate::node::SchemaNode;
use crate::shape::Shape;

/// Outcome of running a validator over data that it could process.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The data passed; carries the parsed data.
    Valid(Value),
    /// The data was rejected.
    Invalid(NativeErrors),
}

impl Validation {
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// A schema-backed validator.
///
/// `parse` rejecting the data is not an error; `Err` means the validator
/// itself could not run and maps to `SchemaError::ValidatorFailure`.
pub trait Validator: Send + Sync {
    /// Stable identity, used as the default form id.
    fn id(&self) -> &str;

    fn node(&self) -> &SchemaNode;

    /// Shape guide of the schema. Implementations compute it once.
    fn shape(&self) -> &Shape;

    /// Default instance of the schema. Implementations compute it once.
    fn default_value(&self) -> &Value;

    /// Validate synchronously.
    ///
    /// # Errors
    ///
    /// Returns an error when the validator cannot run at all.
    fn parse(&self, data: &Value) -> Result<Validation, SchemaError>;

    /// Validate asynchronously. Defaults to the synchronous form.
    fn parse_async(&self, data: &Value) -> impl Future<Output = Result<Validation, SchemaError>> + Send {
        std::future::ready(self.parse(data))
    }

    /// Whether the root carries checks beyond its structure.
    fn has_effects(&self) -> bool {
        self.node().unwrapped().effects
    }
}
