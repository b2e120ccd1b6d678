//! Options and results of session operations.

use form_core::Value;
use form_schema::Validated;

use crate::directive::TaintDirective;

/// Which stores a field validation writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateTarget {
    #[default]
    All,
    Errors,
    Value,
    None,
}

impl UpdateTarget {
    #[must_use]
    pub const fn writes_value(self) -> bool {
        matches!(self, Self::All | Self::Value)
    }

    #[must_use]
    pub const fn writes_errors(self) -> bool {
        matches!(self, Self::All | Self::Errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidateOptions {
    /// Validate with this value at the field instead of the current one.
    /// Written to the form when `update` includes the value.
    pub value: Option<Value>,
    pub update: UpdateTarget,
    /// Taint applied when `value` is written. Defaults to
    /// [`TaintDirective::Untaint`].
    pub taint: Option<TaintDirective>,
    /// Reported in place of the validator's messages when the field is
    /// invalid.
    pub errors: Option<Vec<String>>,
}

/// Result of [`FormSession::validate`](crate::FormSession::validate).
#[derive(Debug, Clone, PartialEq)]
pub enum ValidateOutcome {
    /// Messages of one field, `None` when it is valid.
    Field(Option<Vec<String>>),
    /// The whole form.
    Form(Box<Validated>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResetOptions {
    /// Keep the current message instead of the initial one.
    pub keep_message: bool,
    /// Top-level fields laid over the initial data.
    pub data: Option<Value>,
    /// New form id.
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_targets() {
        assert!(UpdateTarget::All.writes_value() && UpdateTarget::All.writes_errors());
        assert!(!UpdateTarget::Errors.writes_value());
        assert!(!UpdateTarget::Value.writes_errors());
        assert!(!UpdateTarget::None.writes_value() && !UpdateTarget::None.writes_errors());
    }
}
