//! Toggles for diagnostic warnings.

use serde::{Deserialize, Serialize};

const fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WarningsConfig {
    /// Warn when two live sessions share a form id.
    #[serde(default = "enabled")]
    pub duplicate_id: bool,

    /// Warn when a session is built from bare data, with no validator constraints.
    #[serde(default = "enabled")]
    pub no_validation_and_constraints: bool,
}

impl Default for WarningsConfig {
    fn default() -> Self {
        Self {
            duplicate_id: enabled(),
            no_validation_and_constraints: enabled(),
        }
    }
}
