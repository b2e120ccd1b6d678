//! # form-core
//!
//! Schema-agnostic tree primitives for formtree.
//!
//! This crate provides the building blocks every other formtree crate uses:
//! - `Value`: the dynamically shaped data tree (objects, arrays, and opaque leaves)
//! - `Path`: ordered key/index segments and their `a.b[2].c` string form
//! - Traversal: single-path descent and whole-tree walks with continue/skip/abort control
//! - Diffing: changed leaf paths between two snapshots of a tree
//! - `ErrorTree`: the canonical, data-shaped error tree with `_errors` aggregates
//! - `TaintTree`: which fields the user has touched since the last authoritative snapshot
//! - Cross-cutting error types

pub mod diff;
pub mod error;
pub mod error_tree;
pub mod path;
pub mod taint;
pub mod traversal;
pub mod value;

pub use diff::diff;
pub use error::CoreError;
pub use error_tree::{ClearOptions, ErrorTree, FORM_ERRORS_KEY, FlatError};
pub use path::{Path, Segment};
pub use taint::{TaintState, TaintTree};
pub use traversal::{Descend, Leaf, LeafMut, Node, Step, Visit};
pub use value::Value;
