//! Captured session state.

use form_core::{ErrorTree, TaintTree, Value};
use serde::{Deserialize, Serialize};

/// Everything needed to put a session back the way it was, for instance
/// after navigating away and back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub valid: bool,
    pub posted: bool,
    pub errors: ErrorTree,
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// `None` restores with no taint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tainted: Option<TaintTree>,
}
