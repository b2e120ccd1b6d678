//! How form data is posted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Flat form fields; nested objects are rejected.
    #[default]
    Form,
    /// Posted as one JSON document; nesting is allowed.
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default)]
    pub data_type: DataType,
}
