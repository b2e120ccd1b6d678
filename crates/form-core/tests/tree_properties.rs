//! Properties that hold across the tree primitives.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use form_core::{ClearOptions, ErrorTree, Path, Segment, TaintTree, Value, diff};
use proptest::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn as_set(paths: Vec<Path>) -> HashSet<Path> {
    paths.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

#[rstest]
#[case(json!({"name": "", "age": 0}), json!({"name": "Alice", "age": 0}))]
#[case(json!({"a": {"b": [1, 2, 3]}}), json!({"a": {"b": [1, 2]}}))]
#[case(json!({"a": 1, "b": null}), json!({"c": {"d": true}}))]
#[case(json!({"list": [{"x": 1}, {"x": 2}]}), json!({"list": [{"x": 1}]}))]
#[case(json!({}), json!({"only": "old"}))]
fn diff_detects_the_same_paths_in_both_directions(
    #[case] a: serde_json::Value,
    #[case] b: serde_json::Value,
) {
    let (a, b) = (Value::from(a), Value::from(b));
    let forward = diff(&a, &b);
    let backward = diff(&b, &a);
    assert_eq!(as_set(forward.clone()), as_set(backward));
    assert_eq!(forward.len(), as_set(forward.clone()).len(), "paths are de-duplicated");
}

#[rstest]
#[case(json!({}))]
#[case(json!({"name": "x", "nested": {"list": [1, [2, {"z": null}]]}}))]
#[case(json!([1, "two", false]))]
fn diff_of_a_tree_with_itself_is_empty(#[case] tree: serde_json::Value) {
    let tree = Value::from(tree);
    assert_eq!(diff(&tree, &tree), Vec::<Path>::new());
}

#[test]
fn diff_reports_deleted_leaves() {
    let before = Value::from(json!({"keep": 1, "drop": {"deep": "x"}}));
    let after = Value::from(json!({"keep": 1}));
    let changed = diff(&after, &before);
    assert_eq!(changed, vec![Path::parse("drop.deep").unwrap()]);
}

#[test]
fn diff_of_equal_dates_and_sets_is_empty() {
    let when = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
    let make = |order: [i32; 3]| -> Value {
        [
            ("when".to_string(), Value::Date(when)),
            ("ids".to_string(), Value::set(order.map(Value::from))),
        ]
        .into_iter()
        .collect()
    };
    assert!(diff(&make([1, 2, 3]), &make([3, 1, 2])).is_empty());
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[rstest]
#[case("a")]
#[case("a.b.c")]
#[case("items[0].name")]
#[case("matrix[3][4]")]
#[case("[2]")]
fn path_strings_roundtrip(#[case] input: &str) {
    let parsed = Path::parse(input).unwrap();
    assert_eq!(parsed.format().unwrap(), input);
    assert_eq!(Path::parse(&parsed.format().unwrap()).unwrap(), parsed);
}

// ---------------------------------------------------------------------------
// Error and taint trees
// ---------------------------------------------------------------------------

#[test]
fn clearing_preserves_root_form_errors_only() {
    let original = json!({
        "_errors": ["Passwords do not match"],
        "password": ["Too short"],
        "profile": {"_errors": ["Incomplete"], "bio": ["Too long"]},
    });
    let mut errors = ErrorTree::from(Value::from(original));
    errors.clear(&ClearOptions::default());

    let flat = errors.flatten();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].path, "_errors");
    assert_eq!(flat[0].messages, vec!["Passwords do not match".to_string()]);

    for field in ["password", "profile._errors", "profile.bio"] {
        let path = Path::parse(field).unwrap();
        assert_eq!(errors.entry(&path).unwrap(), Some(&Value::Undefined), "{field}");
    }
}

#[test]
fn reverting_a_field_produces_no_taint_change() {
    let baseline = Value::from(json!({"name": "", "age": 0}));
    let edited = Value::from(json!({"name": "Bob", "age": 0}));

    let mut taint = TaintTree::new();
    taint.taint(&diff(&edited, &baseline));
    assert!(taint.is_tainted());

    let reverted = baseline.clone();
    assert!(diff(&reverted, &baseline).is_empty());
}

// ---------------------------------------------------------------------------
// Generated paths and trees
// ---------------------------------------------------------------------------

fn arb_segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,6}".prop_map(Segment::Key),
        (0usize..10_000).prop_map(Segment::Index),
    ]
}

fn arb_path() -> impl Strategy<Value = Path> {
    prop::collection::vec(arb_segment(), 0..6).prop_map(Path::from)
}

fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        (-100i32..100).prop_map(serde_json::Value::from),
        "[a-z]{0,4}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|fields| serde_json::Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Object-rooted trees, like form data.
fn arb_form() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", arb_json(), 0..4)
        .prop_map(|fields| Value::from(serde_json::Value::Object(fields.into_iter().collect())))
}

proptest! {
    #[test]
    fn formatted_paths_parse_back(path in arb_path()) {
        let text = path.format().unwrap();
        prop_assert_eq!(Path::parse(&text).unwrap(), path);
    }

    #[test]
    fn keys_holding_delimiters_do_not_format(
        head in "[a-z]{0,3}",
        delimiter in prop::sample::select(vec!['.', '[', ']']),
        tail in "[a-z]{0,3}",
    ) {
        let path = Path::from(vec![Segment::Key(format!("{head}{delimiter}{tail}"))]);
        prop_assert!(path.format().is_err());
    }

    #[test]
    fn diff_with_itself_is_empty(tree in arb_form()) {
        prop_assert!(diff(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn diff_is_symmetric_and_free_of_duplicates(a in arb_form(), b in arb_form()) {
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);
        prop_assert_eq!(forward.len(), as_set(forward.clone()).len());
        prop_assert_eq!(as_set(forward), as_set(backward));
    }

    #[test]
    fn diff_reports_only_leaf_paths(a in arb_form(), b in arb_form()) {
        for path in diff(&a, &b) {
            let leaf_in = |tree: &Value| tree.pointer(&path).is_some_and(Value::is_leaf);
            prop_assert!(leaf_in(&a) || leaf_in(&b), "{path} is not a leaf on either side");
        }
    }
}
