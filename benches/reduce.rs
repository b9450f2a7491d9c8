//! Benchmark rule-driven reduction against a full serde_json parse.
//!
//! Documents are nested telemetry: devices with a `Model`, each holding
//! readings with a `Value`. The task is summing the readings of `TX`
//! devices.
//!
//! Run with:
//! ```bash
//! cargo bench --bench reduce
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rustyjson::{Reducer, Rule, ScalarKind};
use serde_json::Value;
use std::fmt::Write;

const MODELS: [&str; 4] = ["TX", "RX", "TXR", "AB"];

/// Generate a telemetry document with `devices` devices
fn generate(rng: &mut fastrand::Rng, devices: usize) -> String {
    let mut doc = String::from(r#"{"Telemetry":["#);
    for d in 0..devices {
        if d > 0 {
            doc.push(',');
        }
        let model = MODELS[rng.usize(..MODELS.len())];
        let _ = write!(doc, r#"{{"Id":{},"Model":"{}","Telemetry":["#, d, model);
        for r in 0..rng.usize(1..8) {
            if r > 0 {
                doc.push(',');
            }
            let _ = write!(
                doc,
                r#"{{"Timestamp":"2024-01-01T00:00:{:02}Z","Value":{},"Ok":{}}}"#,
                r,
                rng.i32(-500..500),
                rng.bool()
            );
        }
        doc.push_str("]}");
    }
    doc.push_str("]}");
    doc
}

fn tx_sum() -> Reducer<i64> {
    Reducer::builder(0)
        .rule(
            Rule::new(["{", "Telemetry", "[", "{"], |v, _, path, _| {
                if !v.str_eq("TX") {
                    path.invalidate(2);
                }
            })
            .property("Model")
            .kind(ScalarKind::String),
        )
        .rule(
            Rule::new(
                ["{", "Telemetry", "[", "{", "Telemetry", "[", "{"],
                |v, _, _, sum| *sum += v.as_i64().unwrap_or(0),
            )
            .property("Value")
            .kind(ScalarKind::Number),
        )
        .build()
        .expect("valid rules")
}

fn serde_sum(input: &str) -> i64 {
    let doc: Value = serde_json::from_str(input).expect("valid JSON");
    doc["Telemetry"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|device| device["Model"] == "TX")
        .flat_map(|device| device["Telemetry"].as_array().into_iter().flatten())
        .filter_map(|reading| reading["Value"].as_i64())
        .sum()
}

fn bench_reduce(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let reducer = tx_sum();
    let mut group = c.benchmark_group("telemetry_sum");

    for devices in [10, 1_000, 20_000] {
        let doc = generate(&mut rng, devices);
        assert_eq!(reducer.process(doc.as_bytes()).unwrap(), serde_sum(&doc));
        group.throughput(Throughput::Bytes(doc.len() as u64));

        group.bench_with_input(BenchmarkId::new("reducer", devices), &doc, |b, doc| {
            b.iter(|| reducer.process(black_box(doc.as_bytes())).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("serde_json", devices), &doc, |b, doc| {
            b.iter(|| serde_sum(black_box(doc)))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(42);
    let reducer = tx_sum();
    let docs: Vec<String> = (0..256).map(|_| generate(&mut rng, 100)).collect();
    let inputs: Vec<&[u8]> = docs.iter().map(|d| d.as_bytes()).collect();
    let bytes: usize = docs.iter().map(String::len).sum();

    let mut group = c.benchmark_group("telemetry_batch");
    group.throughput(Throughput::Bytes(bytes as u64));
    group.bench_function("sequential", |b| {
        b.iter(|| {
            inputs
                .iter()
                .map(|doc| reducer.process(black_box(doc)).unwrap())
                .sum::<i64>()
        })
    });
    group.bench_function("parallel", |b| {
        b.iter(|| reducer.process_batch(black_box(&inputs)).len())
    });
    group.finish();
}

criterion_group!(benches, bench_reduce, bench_batch);
criterion_main!(benches);
