//! Path addressing for tree nodes.
//!
//! A [`Path`] is an ordered list of [`Segment`]s. Its string form joins keys
//! with `.` and writes indices as `[n]`: `address.lines[2].text`. Parsing and
//! formatting are exact inverses for every path whose keys are non-empty and
//! free of `.`, `[` and `]`.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// The index this segment addresses, for `Index` segments and keys
    /// spelled as a canonical decimal number.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(key) => parse_index(key),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for Segment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Parse a canonical decimal index (`"0"`, `"17"`, never `"07"` or `"+1"`).
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

/// An ordered sequence of segments locating a node in a tree.
///
/// Two paths are equal when their segments are equal element-wise; the
/// empty path addresses the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The root path.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub const fn from_segments(segments: Vec<Segment>) -> Self {
        Self(segments)
    }

    /// Builder step appending a key.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Segment::Key(key.into()));
        self
    }

    /// Builder step appending an index.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.0.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.0.pop()
    }

    /// A new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<Segment>) -> Self {
        let mut joined = self.clone();
        joined.push(segment);
        joined
    }

    /// The path without its last segment, or `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<Segment> {
        self.0
    }

    /// Parse `a.b[2].c` into segments.
    ///
    /// Keys are split on `.`; each key may be followed by any number of
    /// `[n]` index suffixes. A path may start with an index (`[0].name`).
    /// The empty string is the root path.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPathSyntax` for empty keys, stray or
    /// unclosed brackets, and non-numeric indices.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let mut segments = Vec::new();
        if input.is_empty() {
            return Ok(Self(segments));
        }

        for (position, part) in input.split('.').enumerate() {
            let (name, mut rest) = part.find('[').map_or((part, ""), |i| part.split_at(i));

            if name.contains(']') {
                return Err(CoreError::invalid_path(input, "unexpected ']'"));
            }
            if name.is_empty() {
                // Only a leading index may stand without a key: "[0].name".
                if position > 0 || rest.is_empty() {
                    return Err(CoreError::invalid_path(input, "empty key"));
                }
            } else {
                segments.push(Segment::Key(name.to_string()));
            }

            while !rest.is_empty() {
                let inner = rest
                    .strip_prefix('[')
                    .ok_or_else(|| CoreError::invalid_path(input, "expected '[' after index"))?;
                let close = inner
                    .find(']')
                    .ok_or_else(|| CoreError::invalid_path(input, "unclosed '['"))?;
                let digits = &inner[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoreError::invalid_path(
                        input,
                        format!("index '{digits}' is not a non-negative integer"),
                    ));
                }
                let index = digits.parse::<usize>().map_err(|_| {
                    CoreError::invalid_path(input, format!("index '{digits}' is out of range"))
                })?;
                segments.push(Segment::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self(segments))
    }

    /// Format the path as its string form; the inverse of [`Path::parse`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPathSyntax` when a key is empty or contains
    /// a delimiter (`.`, `[`, `]`). Keys are never escaped.
    pub fn format(&self) -> Result<String, CoreError> {
        for segment in &self.0 {
            if let Segment::Key(key) = segment {
                if key.is_empty() {
                    return Err(CoreError::invalid_path(&self.to_string(), "empty key"));
                }
                if key.contains(['.', '[', ']']) {
                    return Err(CoreError::invalid_path(
                        &self.to_string(),
                        format!("key '{key}' contains a path delimiter"),
                    ));
                }
            }
        }
        Ok(self.to_string())
    }

    /// String form where numeric keys are written as indices, so the error
    /// entry keyed `"0"` under `tags` reads `tags[0]`.
    #[must_use]
    pub fn merged(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            match segment.as_index() {
                Some(index) => out.push_str(&format!("[{index}]")),
                None => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(&segment.to_string());
                }
            }
        }
        out
    }

    /// Decode a JSON pointer (`/address/lines/0`) into key segments.
    /// `~1` and `~0` unescape to `/` and `~`.
    #[must_use]
    pub fn from_json_pointer(pointer: &str) -> Self {
        let Some(body) = pointer.strip_prefix('/') else {
            return Self::root();
        };
        Self(
            body.split('/')
                .map(|token| Segment::Key(token.replace("~1", "/").replace("~0", "~")))
                .collect(),
        )
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Deref for Path {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[Segment]> for Path {
    fn as_ref(&self) -> &[Segment] {
        &self.0
    }
}

impl From<&[Segment]> for Path {
    fn from(value: &[Segment]) -> Self {
        Self(value.to_vec())
    }
}

impl From<Vec<Segment>> for Path {
    fn from(value: Vec<Segment>) -> Self {
        Self(value)
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", Path::root())]
    #[case("name", Path::root().key("name"))]
    #[case("a.b.c", Path::root().key("a").key("b").key("c"))]
    #[case("tags[2]", Path::root().key("tags").index(2))]
    #[case("a.b[2].c", Path::root().key("a").key("b").index(2).key("c"))]
    #[case("grid[0][1]", Path::root().key("grid").index(0).index(1))]
    #[case("[0].name", Path::root().index(0).key("name"))]
    #[case("a.0", Path::root().key("a").key("0"))]
    fn parses_valid_paths(#[case] input: &str, #[case] expected: Path) {
        assert_eq!(Path::parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("a..b")]
    #[case(".a")]
    #[case("a.")]
    #[case("a[")]
    #[case("a[]")]
    #[case("a[x]")]
    #[case("a[-1]")]
    #[case("a]b")]
    #[case("a[0]b")]
    #[case("a.[0]")]
    #[case("a[99999999999999999999999]")]
    fn rejects_malformed_paths(#[case] input: &str) {
        let err = Path::parse(input).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidPathSyntax { ref path, .. } if path == input),
            "unexpected error for {input}: {err:?}"
        );
    }

    #[rstest]
    #[case(Path::root())]
    #[case(Path::root().key("name"))]
    #[case(Path::root().index(3))]
    #[case(Path::root().index(0).index(1).key("x"))]
    #[case(Path::root().key("a").index(0).key("b").index(12))]
    #[case(Path::root().key("0").key("1"))]
    fn format_then_parse_roundtrips(#[case] path: Path) {
        let formatted = path.format().unwrap();
        assert_eq!(Path::parse(&formatted).unwrap(), path);
    }

    #[rstest]
    #[case(Path::root().key("a.b"))]
    #[case(Path::root().key("a[0]"))]
    #[case(Path::root().key(""))]
    fn format_rejects_delimiters_in_keys(#[case] path: Path) {
        assert!(matches!(path.format(), Err(CoreError::InvalidPathSyntax { .. })));
    }

    #[test]
    fn merged_writes_numeric_keys_as_indices() {
        let path = Path::root().key("tags").key("0").key("label");
        assert_eq!(path.merged(), "tags[0].label");
        assert_eq!(path.to_string(), "tags.0.label");
    }

    #[test]
    fn json_pointer_decodes_escapes() {
        assert_eq!(Path::from_json_pointer(""), Path::root());
        assert_eq!(
            Path::from_json_pointer("/a~1b/0/c~0d"),
            Path::root().key("a/b").key("0").key("c~d")
        );
    }

    #[test]
    fn paths_serialize_as_segment_arrays() {
        let path = Path::root().key("items").index(1);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["items", 1]));
        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn parent_and_join() {
        let path = Path::root().key("a").index(0);
        assert_eq!(path.parent(), Some(Path::root().key("a")));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::root().key("a").join(0_usize), path);
    }

    #[test]
    fn canonical_indices_only() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("42"), Some(42));
        assert_eq!(parse_index("042"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("4a"), None);
    }
}
