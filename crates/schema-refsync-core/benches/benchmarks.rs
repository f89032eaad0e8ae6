//! Criterion benchmarks for the reference rewrite walk.
//!
//! Documents are built or parsed outside the benchmark loop so only the
//! in-memory traversal is measured, not file I/O.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

use schema_refsync_core::{apply_refs, definition_keys, refs_for_keys, SchemaDocument};

fn load_fixture(name: &str) -> SchemaDocument {
    let fixtures_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");
    let path = Path::new(fixtures_dir).join(name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    let value = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e));
    SchemaDocument::from_value(path, value)
}

/// A wide `$defs` section where every definition nests a few referencing
/// properties.
fn wide_document(defs: usize) -> SchemaDocument {
    let mut map = Map::new();
    for i in 0..defs {
        map.insert(
            format!("Def{i}"),
            json!({
                "$ref": format!("#/$defs/Local{i}"),
                "properties": {
                    "child": { (format!("Def{}", (i + 1) % defs)): { "$ref": "#/old" } },
                    "list": { "items": [{ "type": "string" }, { "$ref": "#/x" }] }
                }
            }),
        );
    }
    SchemaDocument::from_value("wide.json", json!({ "$defs": Value::Object(map) }))
}

fn bench_rewrite_fixture(c: &mut Criterion) {
    let derived = load_fixture("derived.json");
    let base = load_fixture("base.json");
    let keys = definition_keys(&derived).unwrap();
    let refs = refs_for_keys(&keys, &base).unwrap();

    c.bench_function("rewrite/fixture", |b| {
        b.iter_batched(
            || derived.clone(),
            |mut doc| apply_refs(black_box(&mut doc), black_box(&refs)).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_rewrite_wide(c: &mut Criterion) {
    let derived = wide_document(1_000);
    let keys = definition_keys(&derived).unwrap();
    let base = SchemaDocument::from_value(
        "base.json",
        json!({
            "$defs": keys
                .iter()
                .step_by(2)
                .map(|k| (k.clone(), json!({ "$ref": format!("common.json#/$defs/{k}") })))
                .collect::<Map<String, Value>>()
        }),
    );
    let refs = refs_for_keys(&keys, &base).unwrap();

    c.bench_function("rewrite/wide_1000", |b| {
        b.iter_batched(
            || derived.clone(),
            |mut doc| apply_refs(black_box(&mut doc), black_box(&refs)).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_rewrite_fixture, bench_rewrite_wide);
criterion_main!(benches);
