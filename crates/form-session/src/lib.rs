//! # form-session
//!
//! Live form state for formtree.
//!
//! This crate provides:
//! - `Store`: a reactive cell over `tokio::sync::watch` (get, set, update, subscribe)
//! - `FormSession`: data, error, and taint trees of one form, plus the
//!   orchestration deciding what each mutation taints and re-validates
//! - `TaintDirective`: how a mutation moves taint
//! - `FieldProxy` / `SessionField`: one field read and written on its own,
//!   with `TextFormat` converting input text to ints, numbers, booleans and dates
//! - `Snapshot`: captured session state for restore
//! - `SessionRegistry`: the live sessions of one host, with duplicate-id warnings
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use form_config::FormConfig;
//! use form_core::Value;
//! use form_schema::{Schema, ValidateFormOptions};
//! use form_session::{SessionRegistry, TaintDirective};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Arc::new(Schema::compile(
//!     "profile",
//!     json!({"type": "object", "properties": {"name": {"type": "string"}}}),
//! )?);
//! let mut registry = SessionRegistry::new(FormConfig::load()?);
//! let session = registry
//!     .open_session(schema, None, &ValidateFormOptions::default())
//!     .await?;
//!
//! session
//!     .set_form(Value::from(json!({"name": "Alice"})), TaintDirective::Taint)
//!     .await?;
//! assert!(session.is_tainted());
//! # Ok(())
//! # }
//! ```

mod directive;
mod error;
mod nested;
mod options;
mod proxy;
mod registry;
mod session;
mod snapshot;
mod store;

pub use directive::TaintDirective;
pub use error::SessionError;
pub use nested::check_flat_data;
pub use options::{ResetOptions, UpdateTarget, ValidateOptions, ValidateOutcome};
pub use proxy::{EmptyAs, FieldProxy, FieldWatch, SessionField, TextFormat, TextKind};
pub use registry::SessionRegistry;
pub use session::FormSession;
pub use snapshot::Snapshot;
pub use store::Store;
