//! Field paths: read and write a location inside a nested [Value].
//!
//! A path is a string such as `items[2].name`: dot-separated keys and
//! bracketed indices, mixed freely. Reads never create structure; writes
//! materialize intermediate containers of the right kind (map for a key
//! segment, list for an index segment) as they descend.

use crate::parser::parse_path;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One step of a parsed path: keyed or indexed access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed field path. Parsing happens once, at schema resolution;
/// `get`/`set` walk the pre-parsed segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a path expression. Fails on empty input, empty segments
    /// (`a..b`) and non-numeric indices.
    pub fn parse(source: &str) -> Result<FieldPath, String> {
        let segments = parse_path(source)?;
        Ok(FieldPath {
            raw: source.to_string(),
            segments,
        })
    }

    /// The original path expression.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Read the value at this path. `None` means the location does not
    /// exist; a present `Value::Null` is `Some`.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut node = root;
        for segment in &self.segments {
            node = match (segment, node) {
                (Segment::Key(key), Value::Map(map)) => map.get(key)?,
                (Segment::Index(index), Value::List(list)) => list.get(*index)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Write `value` at this path, creating intermediate containers as
    /// needed. A non-container node in the way is replaced; lists are
    /// padded with `Value::Null` up to the target index.
    pub fn set(&self, root: &mut Value, value: Value) {
        set_at(root, &self.segments, value);
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn set_at(node: &mut Value, segments: &[Segment], value: Value) {
    match segments.split_first() {
        None => *node = value,
        Some((Segment::Key(key), rest)) => {
            if !matches!(node, Value::Map(_)) {
                *node = Value::Map(BTreeMap::new());
            }
            if let Value::Map(map) = node {
                set_at(map.entry(key.clone()).or_insert(Value::Null), rest, value);
            }
        }
        Some((Segment::Index(index), rest)) => {
            if !matches!(node, Value::List(_)) {
                *node = Value::List(Vec::new());
            }
            if let Value::List(list) = node {
                if list.len() <= *index {
                    list.resize(*index + 1, Value::Null);
                }
                set_at(&mut list[*index], rest, value);
            }
        }
    }
}
