//! Mapping validator errors onto the data shape.

use std::collections::BTreeMap;

use form_core::{ErrorTree, FORM_ERRORS_KEY, Path, Value};
use tracing::warn;

use crate::native::NativeErrors;
use crate::shape::Shape;

/// Re-shape a validator's native error tree into the canonical error tree.
///
/// Messages on a terminal location (no shape there, or outside an object
/// field the shape knows) become that field's message list. Messages on a
/// nested location stay under its `_errors` key. Numeric keys are array
/// elements and reuse the current shape.
///
/// Nothing is dropped: messages below a location the shape calls
/// terminal have no field to render them, so they are moved onto the root
/// `_errors` list and a warning is logged. This holds whether or not the
/// terminal location has messages of its own.
#[must_use]
pub fn map_native_errors(native: &NativeErrors, shape: &Shape) -> ErrorTree {
    let mut stray = Vec::new();
    let mut path = Path::root();
    let mut mapped =
        map_node(native, Some(shape), true, &mut path, &mut stray).unwrap_or_else(Value::object);

    if !stray.is_empty() {
        if let Some(root) = mapped.as_object_mut() {
            let form_errors = root
                .entry(FORM_ERRORS_KEY.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = form_errors {
                items.extend(stray.into_iter().map(Value::String));
            }
        }
    }
    ErrorTree::from(mapped)
}

/// `None` when the location holds nothing after re-homing.
fn map_node(
    native: &NativeErrors,
    shape: Option<&Shape>,
    in_object: bool,
    path: &mut Path,
    stray: &mut Vec<String>,
) -> Option<Value> {
    let terminal = shape.is_none() || (!native.errors.is_empty() && !in_object);
    if terminal {
        let orphaned: Vec<String> = native
            .children
            .values()
            .flat_map(NativeErrors::all_messages)
            .collect();
        if !orphaned.is_empty() {
            warn!(
                path = %path,
                orphaned = orphaned.len(),
                "schema mismatch: terminal field has nested validator errors, reporting them at form level"
            );
            stray.extend(orphaned);
        }
        return (!native.errors.is_empty()).then(|| Value::strings(native.errors.iter().cloned()));
    }

    let mut out = BTreeMap::new();
    if !native.errors.is_empty() {
        out.insert(
            FORM_ERRORS_KEY.to_string(),
            Value::strings(native.errors.iter().cloned()),
        );
    }
    for (key, child) in &native.children {
        let numeric = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
        let child_shape = shape.and_then(|s| if numeric { Some(s) } else { s.get(key) });
        let child_in_object = shape.is_some_and(|s| s.contains(key));

        path.push(key.as_str());
        if let Some(mapped) = map_node(child, child_shape, child_in_object, path, stray) {
            out.insert(key.clone(), mapped);
        }
        path.pop();
    }
    Some(Value::Object(out))
}
