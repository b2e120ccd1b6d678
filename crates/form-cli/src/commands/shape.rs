use form_schema::{Shape, Validator};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ShapeArgs;
use crate::commands::shared::read::read_schema;
use crate::output::output;

/// Derive the shape guide of a schema file.
pub fn run(args: &ShapeArgs) -> anyhow::Result<Shape> {
    let schema = read_schema(&args.schema)?;
    Ok(schema.shape().clone())
}

/// Handle `formtree shape`.
pub fn handle(args: &ShapeArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&run(args)?, flags.format)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::run;
    use crate::cli::root_commands::ShapeArgs;

    #[test]
    fn nested_objects_and_arrays_appear_in_the_shape() {
        let dir = TempDir::new().expect("tempdir");
        let schema = dir.path().join("order.json");
        fs::write(
            &schema,
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string"},
                    "address": {
                        "type": "object",
                        "properties": {"city": {"type": "string"}},
                    },
                    "lines": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"sku": {"type": "string"}},
                        },
                    },
                },
            })
            .to_string(),
        )
        .expect("write");

        let shape = run(&ShapeArgs { schema }).expect("shape should build");
        assert!(!shape.contains("id"));
        assert_eq!(
            serde_json::to_value(&shape).expect("shape serializes"),
            json!({"address": {}, "lines": {}})
        );
    }

    #[test]
    fn broken_schema_fails() {
        let dir = TempDir::new().expect("tempdir");
        let schema = dir.path().join("bad.json");
        fs::write(&schema, r#"{"type": 12}"#).expect("write");
        let err = run(&ShapeArgs { schema }).expect_err("should fail");
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
