use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn raw_output_is_single_line() {
        let rendered = render(&json!({"changed": ["a", "b[0]"]}), OutputFormat::Raw)
            .expect("render should succeed");
        assert_eq!(rendered, r#"{"changed":["a","b[0]"]}"#);
    }

    #[test]
    fn json_output_is_pretty() {
        let rendered =
            render(&json!({"a": 1}), OutputFormat::Json).expect("render should succeed");
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }
}
