//! # bitschema — Schema-Driven Bit-Packing Codec
//!
//! Packs a structured value's fields into a single `u64` word and unpacks
//! such a word back into a structured value, according to a user-supplied
//! bit-layout schema. Useful wherever several small flags and
//! bounded-range values (e.g. game entity state) must travel or be stored
//! as one compact integer.
//!
//! ## Schema format
//!
//! A schema maps *field paths* to *bit ranges*:
//!
//! - **Field path**: dotted keys and bracketed indices into the value
//!   (`level`, `class.index`, `playerValues[0]`).
//! - **Bit range**: `[start, end]`, an inclusive bit interval (bit 0 is
//!   least significant); `[n]` alone marks a one-bit *boolean* field,
//!   while `[n, n]` is a one-bit integer field. Bit positions run 0–63.
//!
//! Schemas can be written as text (comments and trailing commas allowed)
//! or built programmatically as a [Value] map.
//!
//! ## Semantics
//!
//! - Validation happens once, at codec construction; [Codec::pack] and
//!   [Codec::unpack] never fail.
//! - Packing a value that exceeds its field's width truncates it to the
//!   low `width` bits.
//! - Fields that are missing, or hold anything other than an integer or
//!   boolean, are skipped on pack.
//! - Overlapping bit ranges are accepted by default (and corrupt round
//!   trips); [Codec::new_strict] rejects them.
//! - The packed word is 64-bit: bit positions run 0–63, and a range
//!   reaching past bit 63 is a validation error rather than a silent
//!   truncation.
//!
//! ## Example
//!
//! ```
//! use bitschema::{parse, Codec};
//!
//! let schema = parse(
//!     r#"{
//!         level: [0, 7],      // 0 - 255
//!         class: [8, 9],      // 4 classes
//!         isAwesome: [10],    // boolean
//!     }"#,
//! )
//! .unwrap();
//! let codec = Codec::new(Some(&schema)).unwrap();
//!
//! let player = parse(r#"{ level: 100, class: 0, isAwesome: true, name: "Bob" }"#).unwrap();
//! let packed = codec.pack(Some(&player));
//! assert_eq!(packed, 1124);
//!
//! let decoded = codec.unpack(Some(packed));
//! assert_eq!(decoded, parse("{ level: 100, class: 0, isAwesome: true }").unwrap());
//! ```

pub mod codec;
pub mod parser;
pub mod path;
pub mod schema;
pub mod value;

pub use codec::{Codec, Endianness};
pub use parser::parse;
pub use path::{FieldPath, Segment};
pub use schema::{BitRange, Schema, SchemaError, SchemaField};
pub use value::Value;
