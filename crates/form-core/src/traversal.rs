//! Generic tree traversal.
//!
//! - [`descend`] / [`descend_with`] / [`descend_mut`]: follow one path, with an
//!   optional callback at every intermediate node
//! - [`walk`] / [`walk_mut`]: depth-first pre-order visit of every key and index
//! - [`path_exists`] and [`set_paths`], built on the two above
//!
//! Absence is a normal outcome here. Nothing in this module fails on a
//! missing path; callers get `None` and decide what that means.

use crate::path::{Path, Segment};
use crate::value::Value;

/// What a [`walk`] visitor wants next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visit {
    #[default]
    Continue,
    /// Do not descend into this node's children.
    Skip,
    /// Stop the whole walk.
    Abort,
}

/// What a [`descend_with`] callback wants at an intermediate node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Into,
    Stop,
}

/// What a [`descend_mut`] callback wants at an intermediate node.
#[derive(Debug, Clone, PartialEq)]
pub enum Descend {
    /// Descend into the existing child.
    Into,
    /// Write this value at the current key, then descend into it.
    Replace(Value),
    /// Give up; the descent returns `None`.
    Stop,
}

/// A node visited during a walk or an intermediate step of a descent.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    pub parent: &'a Value,
    pub key: &'a Segment,
    /// `None` when `parent` has no such key.
    pub value: Option<&'a Value>,
    /// Full path to this node, `key` included.
    pub path: &'a [Segment],
}

impl Node<'_> {
    /// Leaves are everything that is not an object or array. A missing
    /// value counts as a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.value.is_none_or(Value::is_leaf)
    }
}

/// The end of a successful descent.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf<'a> {
    pub parent: &'a Value,
    pub key: Segment,
    /// `None` when the final key is missing from `parent`.
    pub value: Option<&'a Value>,
    pub path: Path,
}

/// The end of a successful mutable descent. Writes go through [`LeafMut::set`].
#[derive(Debug)]
pub struct LeafMut<'a> {
    pub parent: &'a mut Value,
    pub key: Segment,
    pub path: Path,
}

impl LeafMut<'_> {
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.parent.get(&self.key)
    }

    pub fn value_mut(&mut self) -> Option<&mut Value> {
        self.parent.get_mut(&self.key)
    }

    /// Write `value` at the leaf's key in the parent. Returns `false` when
    /// the parent cannot hold the key (a non-numeric key on an array).
    pub fn set(&mut self, value: Value) -> bool {
        self.parent.insert(&self.key, value)
    }
}

/// Follow `path` from `root` without callbacks.
///
/// Returns `None` for the empty path, when any intermediate step is
/// missing or `Undefined`, or when the final parent cannot hold children.
#[must_use]
pub fn descend<'a>(root: &'a Value, path: &[Segment]) -> Option<Leaf<'a>> {
    descend_with(root, path, |_| Step::Into)
}

/// Follow `path`, calling `on_node` at every intermediate node before
/// stepping into it.
pub fn descend_with<'a, F>(root: &'a Value, path: &[Segment], mut on_node: F) -> Option<Leaf<'a>>
where
    F: FnMut(&Node<'_>) -> Step,
{
    let (last, init) = path.split_last()?;
    let mut parent = root;

    for (depth, segment) in init.iter().enumerate() {
        let value = parent.get(segment);
        let node = Node {
            parent,
            key: segment,
            value,
            path: &path[..=depth],
        };
        if on_node(&node) == Step::Stop {
            return None;
        }
        parent = value.filter(|v| !v.is_undefined())?;
    }

    if !parent.is_container() {
        return None;
    }
    Some(Leaf {
        parent,
        key: last.clone(),
        value: parent.get(last),
        path: Path::from(path),
    })
}

/// A read-only view handed to [`descend_mut`] callbacks.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub value: Option<&'a Value>,
    pub path: &'a [Segment],
}

/// Follow `path` mutably. At every intermediate node `on_node` may descend,
/// replace the child (creating intermediate nodes on write), or stop.
pub fn descend_mut<'a, F>(root: &'a mut Value, path: &[Segment], mut on_node: F) -> Option<LeafMut<'a>>
where
    F: FnMut(NodeView<'_>) -> Descend,
{
    let (last, init) = path.split_last()?;
    let mut parent = root;

    for (depth, segment) in init.iter().enumerate() {
        let decision = on_node(NodeView {
            value: parent.get(segment),
            path: &path[..=depth],
        });
        match decision {
            Descend::Into => {}
            Descend::Replace(value) => {
                if !parent.insert(segment, value) {
                    return None;
                }
            }
            Descend::Stop => return None,
        }
        parent = match parent.get_mut(segment) {
            Some(next) if !next.is_undefined() => next,
            _ => return None,
        };
    }

    if !parent.is_container() {
        return None;
    }
    Some(LeafMut {
        parent,
        key: last.clone(),
        path: Path::from(path),
    })
}

/// Depth-first pre-order walk of every key and index under `root`.
/// Returns `false` if the visitor aborted.
pub fn walk<F>(root: &Value, mut visitor: F) -> bool
where
    F: FnMut(&Node<'_>) -> Visit,
{
    let mut path = Vec::new();
    walk_node(root, &mut path, &mut visitor)
}

fn walk_node<F>(parent: &Value, path: &mut Vec<Segment>, visitor: &mut F) -> bool
where
    F: FnMut(&Node<'_>) -> Visit,
{
    for (segment, value) in parent.entries() {
        path.push(segment.clone());
        let verdict = visitor(&Node {
            parent,
            key: &segment,
            value: Some(value),
            path: path.as_slice(),
        });
        let keep_going = match verdict {
            Visit::Abort => false,
            Visit::Skip => true,
            Visit::Continue => value.is_leaf() || walk_node(value, path, visitor),
        };
        path.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

/// Mutable counterpart of [`walk`]. The visitor may overwrite the node it
/// is given; the walk then continues into whatever the node now holds.
pub fn walk_mut<F>(root: &mut Value, mut visitor: F) -> bool
where
    F: FnMut(&[Segment], &mut Value) -> Visit,
{
    let mut path = Vec::new();
    walk_node_mut(root, &mut path, &mut visitor)
}

fn walk_node_mut<F>(node: &mut Value, path: &mut Vec<Segment>, visitor: &mut F) -> bool
where
    F: FnMut(&[Segment], &mut Value) -> Visit,
{
    let children: Vec<(Segment, &mut Value)> = match node {
        Value::Object(map) => map
            .iter_mut()
            .map(|(key, value)| (Segment::Key(key.clone()), value))
            .collect(),
        Value::Array(items) => items
            .iter_mut()
            .enumerate()
            .map(|(index, value)| (Segment::Index(index), value))
            .collect(),
        _ => return true,
    };

    for (segment, value) in children {
        path.push(segment);
        let keep_going = match visitor(path.as_slice(), value) {
            Visit::Abort => false,
            Visit::Skip => true,
            Visit::Continue => walk_node_mut(value, path, visitor),
        };
        path.pop();
        if !keep_going {
            return false;
        }
    }
    true
}

/// Descend that treats a primitive met before the end of the path as
/// absence rather than stepping through it.
#[must_use]
pub fn path_exists<'a>(root: &'a Value, path: &[Segment]) -> Option<Leaf<'a>> {
    descend_with(root, path, |node| match node.value {
        Some(value) if value.is_leaf() && !value.is_undefined() => Step::Stop,
        _ => Step::Into,
    })
}

/// Write `value` at every path, creating intermediate objects. An
/// intermediate that is missing, `Undefined` or a leaf is replaced by an
/// empty object, since a deeper path now needs it to be a node.
pub fn set_paths<'p, I>(root: &mut Value, paths: I, value: &Value)
where
    I: IntoIterator<Item = &'p Path>,
{
    for path in paths {
        let leaf = descend_mut(root, path, |node| match node.value {
            Some(existing) if existing.is_container() => Descend::Into,
            _ => Descend::Replace(Value::object()),
        });
        if let Some(mut leaf) = leaf {
            leaf.set(value.clone());
        }
    }
}
