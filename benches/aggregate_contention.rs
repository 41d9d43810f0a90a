use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use std::thread;
use wavestorm::aggregate::AggregateCounter;

fn bench_record_failure(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_failure");

    for threads in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let counter = Arc::new(AggregateCounter::new());
                let ticket = counter.ticket();
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let ticket = ticket.clone();
                        thread::spawn(move || {
                            for _ in 0..1_000 {
                                black_box(ticket.record_failure());
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
                assert_eq!(counter.snapshot(), threads as u64 * 1_000);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_record_failure);
criterion_main!(benches);
