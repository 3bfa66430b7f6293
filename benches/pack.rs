//! Benchmark: schema parse+resolve, pack, and unpack on a small game-state
//! schema with nested paths.

use bitschema::{parse, Codec};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SCHEMA: &str = r#"
{
  level: [0, 7],
  class: [8, 9],
  isAwesome: [10],
  "stats.hp": [11, 20],
  "stats.mp": [21, 30],
  "flags[0]": [31],
  "flags[1]": [32],
  "flags[2]": [33],
}
"#;

const VALUE: &str = r#"
{
  level: 100,
  class: 2,
  isAwesome: true,
  stats: { hp: 1000, mp: 512 },
  flags: [true, false, true],
}
"#;

fn bench_parse_resolve(c: &mut Criterion) {
    c.bench_function("parse_resolve", |b| {
        b.iter(|| {
            let doc = parse(black_box(SCHEMA)).unwrap();
            Codec::new(Some(&doc)).unwrap()
        })
    });
}

fn bench_pack(c: &mut Criterion) {
    let codec = Codec::new(Some(&parse(SCHEMA).unwrap())).unwrap();
    let value = parse(VALUE).unwrap();
    c.bench_function("pack", |b| b.iter(|| codec.pack(black_box(Some(&value)))));
}

fn bench_unpack(c: &mut Criterion) {
    let codec = Codec::new(Some(&parse(SCHEMA).unwrap())).unwrap();
    let value = parse(VALUE).unwrap();
    let packed = codec.pack(Some(&value));
    c.bench_function("unpack", |b| b.iter(|| codec.unpack(black_box(Some(packed)))));
}

criterion_group!(benches, bench_parse_resolve, bench_pack, bench_unpack);
criterion_main!(benches);
