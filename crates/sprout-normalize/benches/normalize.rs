//! Normalization benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use sprout_core::HostNode;
use sprout_normalize::{normalize_selection, ConversionContext, NormalizeOptions};

fn card(i: usize) -> Value {
    json!({
        "id": format!("card-{i}"),
        "name": "Card",
        "type": "FRAME",
        "x": (i % 10) as f64 * 220.0,
        "y": (i / 10) as f64 * 140.0,
        "width": 200.0,
        "height": 120.0,
        "children": [
            { "id": format!("bg-{i}"), "type": "RECTANGLE", "width": 200.0, "height": 120.0 },
            {
                "id": format!("title-{i}"),
                "type": "TEXT",
                "x": 16.0,
                "y": 16.0,
                "width": 120.0,
                "height": 20.0,
                "characters": "Title",
                "fontSize": 16.0
            },
            {
                "id": format!("body-{i}"),
                "type": "TEXT",
                "x": 16.0,
                "y": 44.0,
                "width": 160.0,
                "height": 40.0,
                "characters": "Body copy",
                "fontSize": 12.0
            }
        ]
    })
}

fn selection(count: usize) -> Vec<HostNode> {
    let nodes: Vec<Value> = (0..count).map(card).collect();
    serde_json::from_value(Value::Array(nodes)).unwrap()
}

fn normalize_small(c: &mut Criterion) {
    let nodes = selection(1);
    let options = NormalizeOptions::default();
    c.bench_function("normalize_small", |b| {
        let mut ctx = ConversionContext::new();
        b.iter(|| normalize_selection(black_box(&nodes), &options, &mut ctx))
    });
}

fn normalize_grid(c: &mut Criterion) {
    let nodes = selection(100);
    let options = NormalizeOptions::default();
    c.bench_function("normalize_grid", |b| {
        let mut ctx = ConversionContext::new();
        b.iter(|| normalize_selection(black_box(&nodes), &options, &mut ctx))
    });
}

criterion_group!(benches, normalize_small, normalize_grid);
criterion_main!(benches);
