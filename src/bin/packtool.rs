//! Pack and unpack values against a bit-layout schema file.
//!
//! Usage:
//!   packtool SCHEMA_FILE --pack '{ level: 100, isAwesome: true }'
//!   packtool SCHEMA_FILE --unpack 1124
//!
//! Options:
//!   --pack LITERAL    pack a value document; prints the packed word (dec and hex)
//!   --unpack NUMBER   unpack a word (decimal or 0x-prefixed); prints the document
//!   --strict          reject schemas with overlapping bit ranges
//!   --little          little-endian byte order for --bytes
//!   --bytes           also print the packed word as 8 bytes

use bitschema::{parse, Codec, Endianness, Value};
use std::path::PathBuf;

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == name) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn take_option(args: &mut Vec<String>, name: &str) -> anyhow::Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    args.remove(pos);
    if pos >= args.len() {
        anyhow::bail!("{} requires an argument", name);
    }
    Ok(Some(args.remove(pos)))
}

fn parse_number(s: &str) -> anyhow::Result<u64> {
    let number = if let Some(hex) = s.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)?
    } else {
        s.parse::<u64>()?
    };
    Ok(number)
}

fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let strict = take_flag(&mut args, "--strict");
    let little = take_flag(&mut args, "--little");
    let bytes = take_flag(&mut args, "--bytes");
    let pack_literal = take_option(&mut args, "--pack")?;
    let unpack_number = take_option(&mut args, "--unpack")?;

    let schema_path: PathBuf = match args.pop() {
        Some(p) if args.is_empty() => PathBuf::from(p),
        _ => anyhow::bail!(
            "usage: packtool SCHEMA_FILE (--pack LITERAL | --unpack NUMBER) [--strict] [--little] [--bytes]"
        ),
    };

    let src = std::fs::read_to_string(&schema_path)?;
    let document = parse(&src).map_err(|e| anyhow::anyhow!(e))?;
    let mut codec = if strict {
        Codec::new_strict(Some(&document))?
    } else {
        Codec::new(Some(&document))?
    };
    if little {
        codec.endianness = Endianness::Little;
    }

    match (pack_literal, unpack_number) {
        (Some(literal), None) => {
            let value: Value = parse(&literal).map_err(|e| anyhow::anyhow!(e))?;
            let packed = codec.pack(Some(&value));
            println!("{} ({:#x})", packed, packed);
            if bytes {
                let word = codec.pack_bytes(Some(&value));
                let hex: Vec<String> = word.iter().map(|b| format!("{:02x}", b)).collect();
                println!("{}", hex.join(" "));
            }
        }
        (None, Some(number)) => {
            let number = parse_number(&number)?;
            println!("{}", codec.unpack(Some(number)));
        }
        _ => anyhow::bail!("exactly one of --pack or --unpack is required"),
    }
    Ok(())
}
