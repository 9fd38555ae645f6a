//! # Framework Benchmarks
//!
//! Performance benchmarks for sponge-core helpers.
//!
//! Run with: `cargo bench -p sponge-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sponge_core::{Paginator, Settings, SettingsValidator, slugify};
use std::hint::black_box;

const SETTINGS: &str = "\
run-as: wsgi
host: 0.0.0.0
port: 4000
autoreload: true
application:
    classes:
        HelloWorldController: /
        AjaxController: /ajax
        ImageHandler: /img
    template-dir: templates
    image-dir: media/img
static:
    /media: media
";

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_settings_validation(c: &mut Criterion) {
    let raw: serde_yaml::Value = serde_yaml::from_str(SETTINGS).expect("parses");

    c.bench_function("settings_validate", |b| {
        let validator = SettingsValidator::new();
        b.iter(|| validator.validate(black_box(&raw)));
    });

    c.bench_function("settings_from_yaml", |b| {
        b.iter(|| Settings::from_yaml(black_box(SETTINGS)));
    });
}

fn bench_pagination(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");

    for size in [100usize, 10_000, 1_000_000] {
        let objects: Vec<usize> = (0..size).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &objects, |b, objects| {
            b.iter(|| {
                let paginator = Paginator::new(black_box(objects), 25);
                let last = paginator.num_pages();
                black_box(paginator.page(last))
            });
        });
    }

    group.finish();
}

fn bench_slugify(c: &mut Criterion) {
    c.bench_function("slugify", |b| {
        b.iter(|| slugify(black_box("São Paulo's Finest Web Framework! (2004)")));
    });
}

criterion_group!(
    benches,
    bench_settings_validation,
    bench_pagination,
    bench_slugify
);
criterion_main!(benches);
