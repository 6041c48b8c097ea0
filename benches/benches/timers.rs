// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_timing::TimerQueue;

fn bench_schedule_and_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("timing/schedule_and_drain");

    // Deadlines arrive mostly in order, as they do for UI timers.
    for len in [16_usize, 128, 1_024] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("in_order", len), &len, |b, &len| {
            b.iter_batched(
                TimerQueue::<usize>::new,
                |mut timers| {
                    for i in 0..len {
                        timers.schedule_after(0, i as u64 * 16, i);
                    }
                    while let Some(expired) = timers.pop_due(u64::MAX) {
                        black_box(expired.payload);
                    }
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("reversed", len), &len, |b, &len| {
            b.iter_batched(
                TimerQueue::<usize>::new,
                |mut timers| {
                    for i in (0..len).rev() {
                        timers.schedule_after(0, i as u64 * 16, i);
                    }
                    while let Some(expired) = timers.pop_due(u64::MAX) {
                        black_box(expired.payload);
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    c.bench_function("timing/cancel_half", |b| {
        b.iter_batched(
            || {
                let mut timers = TimerQueue::new();
                let ids: Vec<_> = (0..512_u64).map(|i| timers.schedule_at(i, i)).collect();
                (timers, ids)
            },
            |(mut timers, ids)| {
                for id in ids.iter().step_by(2) {
                    black_box(timers.cancel(*id));
                }
                black_box(timers.len());
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_schedule_and_drain, bench_cancel);
criterion_main!(benches);
