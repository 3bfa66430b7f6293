//! Schema: validated bit layout mapping field paths to bit ranges.
//!
//! A raw schema document (a [Value] map of path → bit-position sequence) is
//! resolved once into a [Schema]; resolution is the only place validation
//! happens, and a resolved schema is immutable. Fields keep the document's
//! (sorted) order, so pack and unpack always visit them identically.

use crate::path::FieldPath;
use crate::value::Value;
use std::collections::HashMap;

/// Highest addressable bit in the packed word.
const MAX_BIT: u32 = 63;

/// Why a schema document was rejected. All variants surface at
/// construction; pack/unpack have no error path.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no schema was supplied")]
    MissingSchema,
    #[error("schema must be a key-value mapping, got {0}")]
    InvalidSchemaType(&'static str),
    #[error("schema must declare at least one field")]
    EmptySchema,
    #[error("field `{0}`: {1}")]
    InvalidFieldDefinition(String, String),
    #[error("field `{0}`: {1}")]
    InvalidBitRange(String, String),
    #[error("field path `{0}`: {1}")]
    InvalidFieldPath(String, String),
    /// Strict mode only; the permissive default accepts overlapping ranges.
    #[error("fields `{0}` and `{1}` occupy overlapping bit ranges")]
    OverlappingFields(String, String),
}

/// Inclusive bit interval a field occupies in the packed word.
///
/// A range declared with a single position is a boolean field. `[n, n]`
/// spans the same bit but decodes as a one-bit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRange {
    start: u32,
    end: Option<u32>,
}

impl BitRange {
    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end.unwrap_or(self.start)
    }

    pub fn is_boolean(&self) -> bool {
        self.end.is_none()
    }

    pub fn width(&self) -> u32 {
        self.end() - self.start + 1
    }

    /// Low `width` ones. Values are truncated with this before placement.
    pub fn mask(&self) -> u64 {
        u64::MAX >> (64 - self.width())
    }
}

/// One resolved field: parsed path plus bit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub path: FieldPath,
    pub range: BitRange,
}

/// A resolved schema: fields in document order plus a by-path index.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<SchemaField>,
    by_path: HashMap<String, usize>,
}

impl Schema {
    /// Validate and resolve a schema document. `None` stands for an absent
    /// schema. Overlapping bit ranges are accepted here; use
    /// [Schema::resolve_strict] to reject them.
    pub fn resolve(document: Option<&Value>) -> Result<Schema, SchemaError> {
        let document = document.ok_or(SchemaError::MissingSchema)?;
        let entries = match document {
            Value::Map(entries) => entries,
            other => return Err(SchemaError::InvalidSchemaType(other.kind())),
        };
        if entries.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut fields = Vec::with_capacity(entries.len());
        let mut by_path = HashMap::with_capacity(entries.len());
        for (key, definition) in entries {
            let range = resolve_range(key, definition)?;
            let path = FieldPath::parse(key)
                .map_err(|e| SchemaError::InvalidFieldPath(key.clone(), e))?;
            by_path.insert(key.clone(), fields.len());
            fields.push(SchemaField { path, range });
        }
        Ok(Schema { fields, by_path })
    }

    /// Like [Schema::resolve], but additionally rejects schemas whose
    /// fields overlap in bit positions.
    pub fn resolve_strict(document: Option<&Value>) -> Result<Schema, SchemaError> {
        let schema = Schema::resolve(document)?;
        schema.check_overlaps()?;
        Ok(schema)
    }

    /// Fields in schema order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by its path expression.
    pub fn field(&self, path: &str) -> Option<&SchemaField> {
        self.by_path.get(path).map(|&i| &self.fields[i])
    }

    fn check_overlaps(&self) -> Result<(), SchemaError> {
        let mut spans: Vec<(u32, u32, &str)> = self
            .fields
            .iter()
            .map(|f| (f.range.start(), f.range.end(), f.path.as_str()))
            .collect();
        spans.sort();
        for pair in spans.windows(2) {
            let (_, prev_end, prev_path) = pair[0];
            let (next_start, _, next_path) = pair[1];
            if next_start <= prev_end {
                return Err(SchemaError::OverlappingFields(
                    prev_path.to_string(),
                    next_path.to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn resolve_range(key: &str, definition: &Value) -> Result<BitRange, SchemaError> {
    let positions = match definition {
        Value::List(positions) => positions,
        other => {
            return Err(SchemaError::InvalidFieldDefinition(
                key.to_string(),
                format!(
                    "definition must be a sequence of bit positions, got {}",
                    other.kind()
                ),
            ))
        }
    };
    if positions.is_empty() || positions.len() > 2 {
        return Err(SchemaError::InvalidFieldDefinition(
            key.to_string(),
            format!(
                "definition must hold 1 or 2 bit positions, got {}",
                positions.len()
            ),
        ));
    }

    let start = bit_position(key, &positions[0])?;
    let end = positions.get(1).map(|p| bit_position(key, p)).transpose()?;
    if let Some(end) = end {
        if end < start {
            return Err(SchemaError::InvalidBitRange(
                key.to_string(),
                format!("end position {} is less than start position {}", end, start),
            ));
        }
    }
    Ok(BitRange { start, end })
}

fn bit_position(key: &str, value: &Value) -> Result<u32, SchemaError> {
    let position = value.as_int().ok_or_else(|| {
        SchemaError::InvalidFieldDefinition(
            key.to_string(),
            format!("bit positions must be integers, got {}", value.kind()),
        )
    })?;
    if position > MAX_BIT as u64 {
        return Err(SchemaError::InvalidBitRange(
            key.to_string(),
            format!("bit position {} exceeds the 64-bit word (max {})", position, MAX_BIT),
        ));
    }
    Ok(position as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn range_width_and_mask() {
        let schema = Schema::resolve(Some(
            &parse("{ level: [0, 7], flag: [10], top: [60, 63] }").unwrap(),
        ))
        .unwrap();

        let level = schema.field("level").unwrap().range;
        assert_eq!((level.start(), level.end()), (0, 7));
        assert_eq!(level.width(), 8);
        assert_eq!(level.mask(), 0xff);
        assert!(!level.is_boolean());

        let flag = schema.field("flag").unwrap().range;
        assert!(flag.is_boolean());
        assert_eq!(flag.width(), 1);
        assert_eq!(flag.mask(), 1);

        let top = schema.field("top").unwrap().range;
        assert_eq!(top.mask(), 0xf);
    }

    #[test]
    fn single_position_pair_is_integer_field() {
        let schema =
            Schema::resolve(Some(&parse("{ a: [3], b: [3, 3] }").unwrap())).unwrap();
        assert!(schema.field("a").unwrap().range.is_boolean());
        assert!(!schema.field("b").unwrap().range.is_boolean());
    }

    #[test]
    fn fields_keep_document_order() {
        let schema = Schema::resolve(Some(
            &parse("{ class: [8, 9], isAwesome: [10], level: [0, 7] }").unwrap(),
        ))
        .unwrap();
        let order: Vec<&str> = schema.fields().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["class", "isAwesome", "level"]);
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn strict_mode_rejects_overlap() {
        let doc = parse("{ fieldA: [0, 2], fieldB: [1, 3] }").unwrap();
        assert!(Schema::resolve(Some(&doc)).is_ok());
        let err = Schema::resolve_strict(Some(&doc)).unwrap_err();
        assert!(matches!(err, SchemaError::OverlappingFields(_, _)));
    }

    #[test]
    fn strict_mode_accepts_adjacent_ranges() {
        let doc = parse("{ a: [0, 2], b: [3, 5], c: [6] }").unwrap();
        assert!(Schema::resolve_strict(Some(&doc)).is_ok());
    }
}
