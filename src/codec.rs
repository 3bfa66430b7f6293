//! Pack structured values into a single integer and back, per a bit-layout
//! schema.
//!
//! Construction validates the schema and fails fast; after that, `pack` and
//! `unpack` are total. Fields whose input is not an integer or boolean are
//! skipped on pack, and unpack extracts whatever bits are present.

use crate::schema::{Schema, SchemaError};
use crate::value::Value;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::{debug, trace};

/// Byte order for the wire helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Big,
    Little,
}

/// A ready-to-use codec holding a resolved, immutable [Schema].
///
/// `pack`/`unpack` take `&self` and share no mutable state, so one codec
/// can be used from many threads once constructed.
#[derive(Debug, Clone)]
pub struct Codec {
    /// Byte order used by [Codec::pack_bytes] / [Codec::unpack_bytes].
    pub endianness: Endianness,
    schema: Schema,
}

impl Codec {
    /// Build a codec from a schema document, validating it once.
    /// Overlapping bit ranges are accepted (and will corrupt round trips);
    /// use [Codec::new_strict] to reject them.
    pub fn new(document: Option<&Value>) -> Result<Codec, SchemaError> {
        Ok(Codec {
            endianness: Endianness::Big,
            schema: Schema::resolve(document)?,
        })
    }

    /// Like [Codec::new], but rejects schemas with overlapping bit ranges.
    pub fn new_strict(document: Option<&Value>) -> Result<Codec, SchemaError> {
        Ok(Codec {
            endianness: Endianness::Big,
            schema: Schema::resolve_strict(document)?,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Pack `value` into a single integer. Never fails: an absent value
    /// packs to `0`, and fields that are missing or not integer/boolean
    /// contribute nothing. Out-of-range values are truncated to the
    /// field's width, not rejected.
    pub fn pack(&self, value: Option<&Value>) -> u64 {
        let Some(value) = value else {
            debug!("nothing to pack, returning zero");
            return 0;
        };

        let mut packed: u64 = 0;
        for field in self.schema.fields() {
            let raw = match field.path.get(value) {
                Some(Value::Int(n)) => *n,
                Some(Value::Bool(b)) => *b as u64,
                // Anything else contributes nothing.
                _ => continue,
            };
            let contribution = (raw & field.range.mask()) << field.range.start();
            trace!(
                "field {}: bits [{}, {}], mask {:#x}, contribution {:#x}",
                field.path,
                field.range.start(),
                field.range.end(),
                field.range.mask(),
                contribution
            );
            // Equivalent to bitwise OR while ranges are disjoint.
            packed = packed.wrapping_add(contribution);
        }
        packed
    }

    /// Unpack `number` into a document. Never fails: an absent number
    /// unpacks to an empty map. Single-position fields decode to booleans,
    /// two-position fields to integers.
    pub fn unpack(&self, number: Option<u64>) -> Value {
        let Some(number) = number else {
            debug!("nothing to unpack, returning an empty map");
            return Value::empty_map();
        };

        let mut out = Value::empty_map();
        for field in self.schema.fields() {
            let raw = (number >> field.range.start()) & field.range.mask();
            let decoded = if field.range.is_boolean() {
                Value::Bool(raw == 1)
            } else {
                Value::Int(raw)
            };
            field.path.set(&mut out, decoded);
        }
        out
    }

    /// Pack and write the result as an 8-byte word in the codec's byte
    /// order.
    pub fn pack_bytes(&self, value: Option<&Value>) -> [u8; 8] {
        let number = self.pack(value);
        let mut buf = [0u8; 8];
        match self.endianness {
            Endianness::Big => BigEndian::write_u64(&mut buf, number),
            Endianness::Little => LittleEndian::write_u64(&mut buf, number),
        }
        buf
    }

    /// Read a word from up to the first 8 bytes in the codec's byte order
    /// and unpack it. Total, like [Codec::unpack]: empty input behaves as
    /// an absent number, short input is zero-extended.
    pub fn unpack_bytes(&self, bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return self.unpack(None);
        }
        let take = bytes.len().min(8);
        let number = match self.endianness {
            Endianness::Big => BigEndian::read_uint(&bytes[..take], take),
            Endianness::Little => LittleEndian::read_uint(&bytes[..take], take),
        };
        self.unpack(Some(number))
    }
}
