use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ipld_typed::prelude::*;
use ipld_typed::ipld;

const SCHEMA: &str = r#"{
    "types": {
        "Entry": {
            "struct": {
                "fields": {
                    "name": { "type": "String" },
                    "size": { "type": "Int" },
                    "kind": { "type": "EntryKind" },
                    "meta": { "type": "Any", "optional": true }
                },
                "representation": {
                    "map": { "fields": { "name": { "rename": "n" }, "size": { "implicit": 0 } } }
                }
            }
        },
        "EntryKind": {
            "enum": { "members": ["File", "Dir"], "representation": { "string": { "File": "file", "Dir": "dir" } } }
        },
        "Listing": { "list": { "valueType": "Entry" } }
    }
}"#;

fn listing() -> Ipld {
    let entries = (0..100)
        .map(|i| {
            ipld!({
                "n": format!("entry-{}", i),
                "size": i * 1024,
                "kind": "dir",
                "meta": { "tags": ["a", "b"], "mode": 420, "ratio": 0.5 },
            })
        })
        .collect();
    Ipld::List(entries)
}

fn bench_transform(c: &mut Criterion) {
    let schema = Schema::from_json(SCHEMA).unwrap();

    c.bench_function("compile", |b| {
        b.iter(|| black_box(create(&schema, "Listing", Options::default()).unwrap()));
    });

    let listing_type = create(&schema, "Listing", Options::default()).unwrap();
    let repr = listing();
    c.bench_function("roundtrip", |b| {
        b.iter(|| {
            let typed = listing_type.to_typed(&repr).unwrap().unwrap();
            let repr2 = listing_type.to_representation(&typed).unwrap().unwrap();
            black_box(repr2.into_owned());
        });
    });

    let any = create(&Schema::new(), "Any", Options::default()).unwrap();
    let names = ipld!(["a", "b", "c", "d", "e", "f", "g", "h"]);
    let strings = create(
        &Schema::from_json(r#"{ "types": { "Names": { "list": { "valueType": "String" } } } }"#)
            .unwrap(),
        "Names",
        Options::default(),
    )
    .unwrap();
    c.bench_function("unchanged", |b| {
        b.iter(|| black_box(strings.to_typed(&names).unwrap()));
    });
    c.bench_function("any", |b| {
        b.iter(|| black_box(any.to_typed(&repr).unwrap()));
    });
}

criterion_group! {
    name = transform;
    config = Criterion::default();
    targets = bench_transform
}

criterion_main!(transform);
