//! Benchmarks for column fitting and row windowing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::indexing_slicing
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use vtable::grid::DataGrid;
use vtable::layout::{RowWindow, ScrollAlign, WindowingEngine};
use vtable::sizing::{measure_column_width, AutoColumnSizer, MonospaceMeasurer, DEFAULT_FONT};
use vtable::types::{AutoFitOptions, ColumnDef};

fn rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("Customer number {i}"),
                "email": format!("customer{i}@example.com"),
                "city": ["Oslo", "Lima", "Kyoto", "Nairobi"][i % 4],
            })
        })
        .collect()
}

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::field("id", "ID"),
        ColumnDef::field("name", "Name"),
        ColumnDef::field("email", "Email"),
        ColumnDef::field("city", "City"),
    ]
}

/// Benchmark the width formula over a single column of values
fn bench_measure_column(c: &mut Criterion) {
    let values: Vec<String> = (0..10_000).map(|i| format!("value {i}")).collect();
    let measurer = MonospaceMeasurer::default();
    let options = AutoFitOptions::default();

    let mut group = c.benchmark_group("measure_column");
    group.throughput(Throughput::Elements(values.len() as u64));
    group.bench_function("10000_values", |b| {
        b.iter(|| {
            measure_column_width(
                &measurer,
                DEFAULT_FONT,
                "Header",
                black_box(&values).iter().map(String::as_str),
                &options,
            )
            .expect("monospace always measures")
        })
    });
    group.finish();
}

/// Compare a cold sizing pass across dataset sizes
fn bench_measure_all(c: &mut Criterion) {
    let measurer = MonospaceMeasurer::default();
    let mut group = c.benchmark_group("measure_all");

    for count in [1_000, 10_000, 50_000] {
        let grid = DataGrid::new(columns(), rows(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("cold", count), &grid, |b, grid| {
            b.iter(|| {
                let mut grid = grid.clone();
                let mut sizer = AutoColumnSizer::new(true, AutoFitOptions::default());
                sizer.measure_all(black_box(&mut grid), &measurer)
            })
        });
    }

    group.finish();
}

/// Benchmark a cached pass (same dataset length)
fn bench_measure_all_cached(c: &mut Criterion) {
    let measurer = MonospaceMeasurer::default();
    let mut grid = DataGrid::new(columns(), rows(10_000));
    let mut sizer = AutoColumnSizer::new(true, AutoFitOptions::default());
    sizer.measure_all(&mut grid, &measurer);

    c.bench_function("measure_all_cached", |b| {
        b.iter(|| sizer.measure_all(black_box(&mut grid), &measurer))
    });
}

/// Benchmark window computation while scrolling through a large table
fn bench_row_window(c: &mut Criterion) {
    let mut window = RowWindow::new(1_000_000, 40.0, 800.0);

    c.bench_function("visible_window_1m_rows", |b| {
        let mut offset = 0.0;
        b.iter(|| {
            offset = (offset + 1234.0) % 39_000_000.0;
            window.set_scroll_offset(offset);
            black_box(window.visible_window())
        })
    });

    c.bench_function("scroll_to_index_1m_rows", |b| {
        let mut index = 0;
        b.iter(|| {
            index = (index + 7919) % 1_000_000;
            black_box(window.scroll_to_index(index, ScrollAlign::Auto))
        })
    });
}

criterion_group!(
    benches,
    bench_measure_column,
    bench_measure_all,
    bench_measure_all_cached,
    bench_row_window,
);

criterion_main!(benches);
