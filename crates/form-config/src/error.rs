//! Errors raised while loading a [`crate::FormConfig`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer (defaults, config file, or `FORMTREE_*` env) could not be
    /// parsed or extracted.
    #[error("failed to load formtree config: {0}")]
    Figment(#[from] figment::Error),

    /// A setting parsed but is not usable.
    #[error("invalid formtree setting '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
