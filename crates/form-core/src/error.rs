//! Cross-cutting error types for formtree.
//!
//! Structural errors raised by the path engine. Validation-domain failures
//! (schema mismatches, validator failures) are defined in `form-schema`, and
//! session-level errors converge in `form-session`.

use thiserror::Error;

/// Errors that can be raised by the tree primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A path string (or a key inside a path) is malformed.
    #[error("Invalid path syntax in '{path}': {reason}")]
    InvalidPathSyntax { path: String, reason: String },

    /// A path walks through a value that cannot hold fields, such as a
    /// message list in the error tree.
    #[error("Not a form field: '{path}' passes through a value that cannot hold fields")]
    NotAField { path: String },
}

impl CoreError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPathSyntax {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
