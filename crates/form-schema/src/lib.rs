//! # form-schema
//!
//! Schema structure, shape guides, error mapping, and validators for formtree.
//!
//! This crate provides:
//! - `SchemaNode`: the structural description of a JSON Schema document
//! - `Shape` / `build_shape`: which error-tree locations are terminal and which nest
//! - `default_value`: default instances for every field
//! - `coerce_dates`: date-format strings turned into dates after validation
//! - `NativeErrors` and `map_native_errors`: validator errors re-shaped onto the data
//! - The `Validator` contract (sync and async) and `Schema`, its `jsonschema` implementation
//! - `validate_form`: a whole-form `Validated` result
//! - `SchemaRegistry`: named, compiled schemas
//!
//! ## Architecture
//!
//! Schemas come either from a JSON Schema document or from a Rust type with
//! `#[derive(JsonSchema)]`. The `jsonschema` crate produces the messages;
//! this crate decides where in the form they belong.

pub mod dates;
pub mod defaults;
pub mod error;
pub mod mapper;
pub mod native;
pub mod node;
pub mod registry;
pub mod schema;
pub mod shape;
pub mod validated;
pub mod validator;

pub use dates::coerce_dates;
pub use defaults::{default_value, with_defaults};
pub use error::SchemaError;
pub use mapper::map_native_errors;
pub use native::NativeErrors;
pub use node::{LeafKind, SchemaNode, TypeInfo};
pub use registry::SchemaRegistry;
pub use schema::Schema;
pub use shape::{Shape, build_shape};
pub use validated::{ValidateFormOptions, Validated, validate_form, validate_form_sync};
pub use validator::{Validation, Validator};
