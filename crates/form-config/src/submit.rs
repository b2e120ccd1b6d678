//! What happens to a form when it is submitted.

use serde::{Deserialize, Serialize};

/// Which parts of the form state are cleared when a submission starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearOnSubmit {
    Errors,
    Message,
    #[default]
    ErrorsAndMessage,
    None,
}

impl ClearOnSubmit {
    #[must_use]
    pub const fn clears_errors(self) -> bool {
        matches!(self, Self::Errors | Self::ErrorsAndMessage)
    }

    #[must_use]
    pub const fn clears_message(self) -> bool {
        matches!(self, Self::Message | Self::ErrorsAndMessage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitConfig {
    #[serde(default)]
    pub clear_on_submit: ClearOnSubmit,

    /// Reset the form to its initial state after a valid submission.
    #[serde(default)]
    pub reset_form: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SubmitConfig::default();
        assert_eq!(config.clear_on_submit, ClearOnSubmit::ErrorsAndMessage);
        assert!(!config.reset_form);
    }

    #[test]
    fn clear_flags() {
        assert!(ClearOnSubmit::Errors.clears_errors());
        assert!(!ClearOnSubmit::Errors.clears_message());
        assert!(ClearOnSubmit::Message.clears_message());
        assert!(!ClearOnSubmit::None.clears_errors());
        assert!(!ClearOnSubmit::None.clears_message());
    }
}
