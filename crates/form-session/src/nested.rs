//! Flat-data check for forms that post plain fields.

use form_core::Value;
use tracing::warn;

use crate::error::SessionError;

/// Reject top-level fields holding objects.
///
/// Dates and other leaves pass, and arrays are judged by their first
/// element, so arrays of primitives pass too.
///
/// # Errors
///
/// Returns `SessionError::NestedData` naming the first offending field.
pub fn check_flat_data(data: &Value) -> Result<(), SessionError> {
    let Some(fields) = data.as_object() else {
        return Ok(());
    };
    for (field, value) in fields {
        if holds_object(value) {
            warn!(field = %field, "nested data in a form that posts flat fields");
            return Err(SessionError::NestedData {
                field: field.clone(),
            });
        }
    }
    Ok(())
}

fn holds_object(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.first().is_some_and(holds_object),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"name": "x", "age": 3, "ok": true, "none": null}))]
    #[case(json!({"tags": ["a", "b"]}))]
    #[case(json!({"grid": [[1, 2], [3]]}))]
    #[case(json!({"empty": []}))]
    fn flat_data_passes(#[case] data: serde_json::Value) {
        assert!(check_flat_data(&Value::from(data)).is_ok());
    }

    #[rstest]
    #[case(json!({"address": {"street": "x"}}), "address")]
    #[case(json!({"a": 1, "lines": [{"sku": "x"}]}), "lines")]
    fn nested_data_is_rejected(#[case] data: serde_json::Value, #[case] field: &str) {
        let err = check_flat_data(&Value::from(data)).unwrap_err();
        assert!(matches!(err, SessionError::NestedData { field: ref f } if f == field));
    }

    #[test]
    fn dates_are_leaves() {
        let data: Value = [("when".to_string(), Value::Date(chrono::Utc::now()))]
            .into_iter()
            .collect();
        assert!(check_flat_data(&data).is_ok());
    }
}
