// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Size};
use understory_zoomport::headless::{HeadlessDocument, NodeId};
use understory_zoomport::{Environment, Region, Strategy, ZoomConfig, ZoomPort, ZoomRequest};

/// A preview with a `cols x rows` grid of cells on the surface.
fn grid_port(cols: u32, rows: u32) -> (ZoomPort<HeadlessDocument>, Vec<NodeId>) {
    let mut doc = HeadlessDocument::new();
    let content = Size::new(f64::from(cols) * 110.0, f64::from(rows) * 110.0);
    let (vp, surface) = doc.add_preview(Size::new(800.0, 600.0), content);
    let mut cells = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let x = f64::from(col) * 110.0;
            let y = f64::from(row) * 110.0;
            cells.push(doc.add_element(surface, Rect::new(x, y, x + 100.0, y + 100.0)));
        }
    }
    let env = Environment::with_strategy(Strategy::Transform);
    let port = ZoomPort::create(doc, vp, Some(surface), &env, ZoomConfig::default(), None)
        .expect("grid binds");
    (port, cells)
}

fn bench_region_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoomport/region");
    let regions: Vec<Region> = (0..1_024)
        .map(|i| {
            let f = f64::from(i);
            Region::new(f * 3.0 - 500.0, f * 2.0 - 300.0, 50.0 + f, 40.0 + f * 0.5)
        })
        .collect();

    group.bench_function("pad_fit_clamp", |b| {
        b.iter(|| {
            for r in &regions {
                let fitted = r
                    .padded(20.0)
                    .fit_aspect(4.0 / 3.0)
                    .clamp_to_bounds(2_000.0, 1_500.0);
                black_box(fitted);
            }
        });
    });
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoomport/plan");
    for side in [4_u32, 16, 64] {
        let (port, cells) = grid_port(side, side);
        let last = *cells.last().expect("non-empty grid");
        group.bench_with_input(BenchmarkId::new("element", side), &last, |b, &cell| {
            b.iter(|| black_box(port.plan(&ZoomRequest::to_element(cell))));
        });
        group.bench_with_input(BenchmarkId::new("scale", side), &side, |b, _| {
            b.iter(|| black_box(port.plan(&ZoomRequest::to_scale(2.5))));
        });
    }
    group.finish();
}

fn bench_animated_zoom(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoomport/animated");
    group.bench_function("to_and_settle", |b| {
        b.iter_batched(
            || {
                let (mut port, cells) = grid_port(8, 8);
                port.set_transitions_on(true).expect("transform strategy");
                (port, cells[27])
            },
            |(mut port, cell)| {
                port.to(ZoomRequest::to_element(cell));
                while let Some(deadline) = port.next_deadline() {
                    port.advance(deadline);
                }
                black_box(port.scale());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_edge_pan(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoomport/edge_pan");
    group.bench_function("one_second_of_ticks", |b| {
        b.iter_batched(
            || {
                let (mut port, _) = grid_port(32, 32);
                port.set_scale(3.0);
                port.pointer_moved(Point::new(790.0, 10.0));
                port.set_panning_on(true);
                port.advance(500);
                port
            },
            |mut port| {
                while let Some(deadline) = port.next_deadline().filter(|&d| d <= 1_500) {
                    port.advance(deadline);
                }
                black_box(port.frame().scroll_offset());
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_region_math,
    bench_plan,
    bench_animated_zoom,
    bench_edge_pan
);
criterion_main!(benches);
