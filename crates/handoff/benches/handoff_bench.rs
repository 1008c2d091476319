//! 핸드오프 벤치마크
//!
//! 큐 적재/꺼내기 처리량과 레코드 변환 비용을 측정합니다.

use std::time::{Duration, SystemTime};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use logbridge_core::types::{Attr, SourceLevel, SourceRecord};
use logbridge_handoff::convert::convert_record;
use logbridge_handoff::queue::HandoffQueue;
use tokio_util::sync::CancellationToken;

fn sample_record(attrs: usize) -> SourceRecord {
    let mut record = SourceRecord::new(SystemTime::now(), SourceLevel::INFO, "request processed");
    record.add_attrs((0..attrs).map(|i| match i % 4 {
        0 => Attr::string(format!("s{i}"), "value"),
        1 => Attr::int64(format!("i{i}"), i as i64),
        2 => Attr::duration(format!("d{i}"), Duration::from_millis(i as u64)),
        _ => Attr::bool(format!("b{i}"), true),
    }));
    record
}

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");

    // 여유 있는 버퍼
    group.throughput(Throughput::Elements(1000));
    group.bench_function("accept_1000", |b| {
        b.iter_batched(
            || HandoffQueue::new(1000),
            |queue| {
                for i in 0..1000u64 {
                    black_box(queue.enqueue(i));
                }
                queue
            },
            criterion::BatchSize::SmallInput,
        )
    });

    // 가득 찬 버퍼 (버림 경로)
    let full = HandoffQueue::new(1);
    full.enqueue(0u64);
    group.throughput(Throughput::Elements(1));
    group.bench_function("drop_when_full", |b| {
        b.iter(|| black_box(full.enqueue(black_box(1u64))))
    });

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let cancel = CancellationToken::new();

    let mut group = c.benchmark_group("enqueue_dequeue");
    for batch in [1usize, 100, 1000] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            let queue = HandoffQueue::new(batch);
            b.iter(|| {
                runtime.block_on(async {
                    for i in 0..batch {
                        queue.enqueue(i);
                    }
                    for _ in 0..batch {
                        black_box(queue.dequeue(&cancel).await);
                    }
                })
            })
        });
    }
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_record");
    for attrs in [0usize, 8, 32, 64] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("attrs", attrs), &attrs, |b, &attrs| {
            b.iter_batched(
                || sample_record(attrs),
                |record| black_box(convert_record(record, 32)),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_enqueue, bench_round_trip, bench_convert);
criterion_main!(benches);
