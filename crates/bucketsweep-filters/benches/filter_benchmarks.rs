//! Throughput benchmarks for filter evaluation over large listings
//!
//! Run with: cargo bench -p bucketsweep-filters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bucketsweep_core::StorageObject;
use bucketsweep_filters::prelude::*;
use bucketsweep_policy::{Policy, Selector};

fn listing(size: usize) -> Vec<StorageObject> {
    (0..size)
        .map(|i| {
            let key = match i % 4 {
                0 => format!("/storage/reports/{i}.pdf"),
                1 => format!("tmp-{i}.txt"),
                2 => format!("logs/2024/{i}.log"),
                _ => format!("/data/{i}/part-0000.parquet"),
            };
            let obj = StorageObject::new(key);
            if i % 3 == 0 {
                obj.with_tag("env", "dev")
            } else {
                obj.with_tag("retain", "true")
            }
        })
        .collect()
}

fn key_policy() -> Policy {
    Policy::new(vec![
        Selector::match_expression(r"\.pdf$"),
        Selector::match_expression("^tmp"),
        Selector::match_expression("my-file"),
        Selector::match_expression(r"^logs/20(1[0-9]|2[0-3])/"),
    ])
}

/// Benchmark the key-pattern filter, compilation included
fn benchmark_object_key_filter(c: &mut Criterion) {
    let policy = key_policy();
    let filter = ObjectKeyFilter::new();

    let mut group = c.benchmark_group("ObjectKeyFilter");
    for size in [1_000, 10_000, 100_000] {
        let objects = listing(size);
        group.bench_with_input(BenchmarkId::new("filter", size), &objects, |b, objects| {
            b.iter(|| filter.filter_all(black_box(objects), &policy).unwrap())
        });
    }
    group.finish();
}

/// Benchmark a narrowing pipeline against a union pipeline
fn benchmark_pipeline(c: &mut Criterion) {
    let mut policy = key_policy();
    policy.selectors.push(Selector::tags([("env", "dev")]));
    policy.selectors.push(Selector::without_tag_keys(["retain"]));

    let kinds = [FilterKind::ObjectKey, FilterKind::Tags, FilterKind::WithoutTagKeys];
    let objects = listing(50_000);

    let mut group = c.benchmark_group("FilterPipeline");
    for composition in [Composition::All, Composition::Any] {
        let pipeline = FilterPipeline::from_kinds(&kinds, composition);
        group.bench_function(BenchmarkId::new("execute", composition), |b| {
            b.iter(|| pipeline.execute(black_box(&objects), &policy).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_object_key_filter, benchmark_pipeline);
criterion_main!(benches);
