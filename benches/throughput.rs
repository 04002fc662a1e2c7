//! Throughput Benchmark for FlashBloom
//!
//! Measures the client-side cost of a round trip minus the network:
//! building commands, serializing them and parsing replies.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flashbloom::protocol::{parse_message, RespValue};
use flashbloom::{CommandBuilder, InsertOptions, Item};

/// Benchmark single-item command construction
fn bench_build(c: &mut Criterion) {
    let builder = CommandBuilder::new("BF");

    let mut group = c.benchmark_group("build");
    group.throughput(Throughput::Elements(1));

    group.bench_function("add_text", |b| {
        let item = Item::from("user:12345");
        b.iter(|| black_box(builder.add("users", &item)));
    });

    group.bench_function("add_number", |b| {
        let item = Item::from(1_234_567_890i64);
        b.iter(|| black_box(builder.add("users", &item)));
    });

    group.bench_function("reserve", |b| {
        b.iter(|| black_box(builder.reserve("users", 0.001, 1_000_000, 2)));
    });

    group.finish();
}

/// Benchmark batch commands of increasing size
fn bench_batches(c: &mut Criterion) {
    let builder = CommandBuilder::new("BF");
    let options = InsertOptions::new().error_rate(0.01).capacity(10_000).no_create();

    let mut group = c.benchmark_group("batch");

    for size in [10usize, 100, 1000] {
        let items: Vec<Item> = (0..size).map(|i| Item::from(format!("item:{}", i))).collect();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("madd_{}", size), |b| {
            b.iter(|| black_box(builder.madd("users", &items)));
        });

        group.bench_function(format!("insert_serialize_{}", size), |b| {
            b.iter(|| {
                let cmd = builder.insert("users", &items, &options).unwrap();
                black_box(cmd.to_resp().serialize())
            });
        });
    }

    group.finish();
}

/// Benchmark parsing of batch replies
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10usize, 100, 1000] {
        let reply = RespValue::array(
            (0..size)
                .map(|i| RespValue::integer((i % 2) as i64))
                .collect(),
        )
        .serialize();

        group.throughput(Throughput::Bytes(reply.len() as u64));
        group.bench_function(format!("flags_{}", size), |b| {
            b.iter(|| black_box(parse_message(&reply).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_batches, bench_parse);
criterion_main!(benches);
