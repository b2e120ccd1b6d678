//! When field edits trigger validation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ValidationMethod {
    /// Validate a field on input once it already has an error entry.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Validate every changed field on input.
    #[serde(rename = "oninput")]
    OnInput,
    /// Defer validation until the field loses focus.
    #[serde(rename = "onblur")]
    OnBlur,
    /// Only validate on submit.
    #[serde(rename = "submit-only")]
    SubmitOnly,
}

impl ValidationMethod {
    /// Whether data updates validate the changed fields immediately.
    #[must_use]
    pub const fn validates_on_update(self) -> bool {
        matches!(self, Self::Auto | Self::OnInput)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub method: ValidationMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ValidationConfig::default();
        assert_eq!(config.method, ValidationMethod::Auto);
        assert!(config.method.validates_on_update());
        assert!(!ValidationMethod::OnBlur.validates_on_update());
        assert!(!ValidationMethod::SubmitOnly.validates_on_update());
    }
}
