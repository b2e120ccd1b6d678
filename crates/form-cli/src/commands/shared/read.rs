use std::path::Path;

use anyhow::Context;
use form_core::Value;
use form_schema::Schema;

/// Read a JSON document into a form tree.
pub fn read_value(path: &Path) -> anyhow::Result<Value> {
    read_json(path).map(Value::from)
}

/// Read and compile a JSON Schema. The schema id is the file stem.
pub fn read_schema(path: &Path) -> anyhow::Result<Schema> {
    let document = read_json(path)?;
    let id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("form")
        .to_string();
    Schema::compile(id, document)
        .with_context(|| format!("failed to compile schema '{}'", path.display()))
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("'{}' is not valid JSON", path.display()))
}
