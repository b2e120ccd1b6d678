//! Changed-path detection between two snapshots of a tree.

use std::collections::HashSet;

use crate::path::Path;
use crate::traversal::{Visit, descend, walk};
use crate::value::Value;

/// Every leaf path whose value differs between `new` and `old`.
///
/// Both trees are walked, each against the other, so removed leaves are
/// reported as well as added and changed ones. Dates and sets are leaves
/// and compare by value. Output order follows the walk of `new` first,
/// then `old`; each path appears once.
#[must_use]
pub fn diff(new: &Value, old: &Value) -> Vec<Path> {
    let mut seen = HashSet::new();
    let mut changed = Vec::new();

    for (tree, other) in [(new, old), (old, new)] {
        walk(tree, |node| {
            let Some(value) = node.value.filter(|v| v.is_leaf()) else {
                return Visit::Continue;
            };
            let differs = descend(other, node.path).is_none_or(|counterpart| {
                counterpart.value.unwrap_or(&Value::Undefined) != value
            });
            if differs {
                let path = Path::from(node.path);
                if seen.insert(path.clone()) {
                    changed.push(path);
                }
            }
            Visit::Continue
        });
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn paths(list: &[&str]) -> Vec<Path> {
        list.iter().map(|p| Path::parse(p).unwrap()).collect()
    }

    #[test]
    fn reports_changed_leaf() {
        let old = Value::from(json!({"name": "", "age": 0}));
        let new = Value::from(json!({"name": "Alice", "age": 0}));
        assert_eq!(diff(&new, &old), paths(&["name"]));
    }

    #[test]
    fn reports_added_and_removed_leaves() {
        let old = Value::from(json!({"a": 1, "gone": {"x": 1}}));
        let new = Value::from(json!({"a": 1, "added": [true]}));
        assert_eq!(diff(&new, &old), paths(&["added[0]", "gone.x"]));
    }

    #[test]
    fn leaf_replaced_by_node_is_reported() {
        let old = Value::from(json!({"a": null}));
        let new = Value::from(json!({"a": {"b": 1}}));
        assert_eq!(diff(&new, &old), paths(&["a.b", "a"]));
    }

    #[test]
    fn identical_trees_have_no_diff() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let tree: Value = [
            ("when".to_string(), Value::Date(date)),
            ("picked".to_string(), Value::set([Value::from(1), Value::from(2)])),
            ("nested".to_string(), Value::from(json!({"deep": [1, [2, 3]]}))),
            ("ratio".to_string(), Value::Number(f64::NAN)),
        ]
        .into_iter()
        .collect();
        assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn dates_and_sets_compare_by_value() {
        let a = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let old: Value = [
            ("when".to_string(), Value::Date(a)),
            ("picked".to_string(), Value::set([Value::from(1), Value::from(2)])),
        ]
        .into_iter()
        .collect();
        let new: Value = [
            ("when".to_string(), Value::Date(b)),
            ("picked".to_string(), Value::set([Value::from(2), Value::from(1)])),
        ]
        .into_iter()
        .collect();
        assert_eq!(diff(&new, &old), paths(&["when"]));
    }

    #[test]
    fn empty_containers_are_not_leaves() {
        let old = Value::object();
        let new = Value::from(json!({"list": [], "obj": {}}));
        assert!(diff(&new, &old).is_empty());
    }
}
