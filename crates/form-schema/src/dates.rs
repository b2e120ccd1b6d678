//! Date fields between their JSON text and `Value::Date`.
//!
//! JSON has no date type, so `format: "date-time"` and `format: "date"`
//! fields arrive as strings. Once data passes validation those strings
//! become `Value::Date`; when data holding dates is validated again, each
//! date is written back in the format its field declares.

use chrono::{DateTime, NaiveDate, Utc};
use form_core::Value;

use crate::node::{LeafKind, SchemaNode};

const CALENDAR_FORMAT: &str = "%Y-%m-%d";

/// `value` with every string under a date field parsed into `Value::Date`.
///
/// Date-time fields take RFC 3339 text; calendar date fields take
/// `YYYY-MM-DD` and land on midnight UTC. Strings that do not parse, and
/// anything under a union, are left as they are.
#[must_use]
pub fn coerce_dates(value: &Value, node: &SchemaNode) -> Value {
    match (node.unwrapped().node, value) {
        (SchemaNode::Leaf(LeafKind::Date), Value::String(text)) => {
            parse_date_time(text).map_or_else(|| value.clone(), Value::Date)
        }
        (SchemaNode::Leaf(LeafKind::CalendarDate), Value::String(text)) => {
            parse_calendar_date(text).map_or_else(|| value.clone(), Value::Date)
        }
        (inner, _) => map_children(value, inner, coerce_dates),
    }
}

/// `value` with dates under calendar date fields written as `YYYY-MM-DD`
/// strings, ready for `to_json`. Date-time fields keep `Value::Date`,
/// which already renders as RFC 3339.
#[must_use]
pub fn calendar_text(value: &Value, node: &SchemaNode) -> Value {
    match (node.unwrapped().node, value) {
        (SchemaNode::Leaf(LeafKind::CalendarDate), Value::Date(date)) => {
            Value::String(date.format(CALENDAR_FORMAT).to_string())
        }
        (inner, _) => map_children(value, inner, calendar_text),
    }
}

/// Parse RFC 3339 text into a UTC instant.
#[must_use]
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text).ok().map(|date| date.with_timezone(&Utc))
}

/// Parse `YYYY-MM-DD` into midnight UTC of that day.
#[must_use]
pub fn parse_calendar_date(text: &str) -> Option<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(text, CALENDAR_FORMAT).ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

fn map_children(value: &Value, node: &SchemaNode, f: fn(&Value, &SchemaNode) -> Value) -> Value {
    match (node, value) {
        (SchemaNode::Object(fields), Value::Object(map)) => map
            .iter()
            .map(|(key, item)| {
                let item = fields.get(key).map_or_else(|| item.clone(), |field| f(item, field));
                (key.clone(), item)
            })
            .collect(),
        (SchemaNode::Array(element), Value::Array(items)) => {
            Value::Array(items.iter().map(|item| f(item, element)).collect())
        }
        (SchemaNode::Record(element), Value::Object(map)) => map
            .iter()
            .map(|(key, item)| (key.clone(), f(item, element)))
            .collect(),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(schema: &serde_json::Value) -> SchemaNode {
        SchemaNode::from_json_schema(schema).unwrap()
    }

    fn events() -> SchemaNode {
        node(&json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "startsAt": {"type": "string", "format": "date-time"},
                "day": {"type": "string", "format": "date"},
                "reminders": {"type": "array", "items": {"type": "string", "format": "date-time"}},
                "holidays": {
                    "type": "object",
                    "additionalProperties": {"type": "string", "format": "date"}
                }
            }
        }))
    }

    #[test]
    fn date_fields_become_dates() {
        let data = Value::from(json!({
            "title": "2024-05-01",
            "startsAt": "2024-05-01T09:30:00+02:00",
            "day": "2024-05-01",
            "reminders": ["2024-04-30T08:00:00Z"],
            "holidays": {"labour": "2024-05-01"}
        }));
        let coerced = coerce_dates(&data, &events());

        let may_first = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(coerced.pointer(&["title".into()]), Some(&Value::from("2024-05-01")));
        assert_eq!(
            coerced.pointer(&["startsAt".into()]),
            Some(&Value::Date(Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap()))
        );
        assert_eq!(coerced.pointer(&["day".into()]), Some(&Value::Date(may_first)));
        assert_eq!(
            coerced.pointer(&["reminders".into(), 0_usize.into()]),
            Some(&Value::Date(Utc.with_ymd_and_hms(2024, 4, 30, 8, 0, 0).unwrap()))
        );
        assert_eq!(
            coerced.pointer(&["holidays".into(), "labour".into()]),
            Some(&Value::Date(may_first))
        );
    }

    #[test]
    fn unparseable_text_is_left_alone() {
        let data = Value::from(json!({"startsAt": "tomorrow", "day": "2024-13-40"}));
        assert_eq!(coerce_dates(&data, &events()), data);
    }

    #[test]
    fn calendar_dates_render_without_time() {
        let data = Value::from(json!({"startsAt": "2024-05-01T00:00:00Z", "day": "2024-05-01"}));
        let coerced = coerce_dates(&data, &events());
        assert_eq!(
            calendar_text(&coerced, &events()).to_json(),
            json!({"startsAt": "2024-05-01T00:00:00+00:00", "day": "2024-05-01"})
        );
    }
}
