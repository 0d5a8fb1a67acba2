use busprobe_log::{MessageLog, QueryOptions, RangeMatcher, TimeIndex};
use busprobe_types::{Message, Nanoseconds, QualifiedTime, QualifiedTimeRange, Qualifier};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn build_index(len: usize) -> TimeIndex {
    TimeIndex::new((0..len as i64).map(|i| Nanoseconds(i * 10)).collect()).unwrap_or_default()
}

/// Benchmark resolving a window whose edges fall between entries
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for len in [100usize, 10_000, 1_000_000].iter() {
        let index = build_index(*len);
        let quarter = (*len as i64 / 4) * 10 + 5;
        let matcher = RangeMatcher::new(QualifiedTimeRange::new(
            QualifiedTime::new(Nanoseconds(quarter), Qualifier::ClosestBefore),
            QualifiedTime::new(Nanoseconds(quarter * 3), Qualifier::ClosestAfter),
        ));

        group.bench_with_input(BenchmarkId::from_parameter(len), &index, |b, index| {
            b.iter(|| black_box(matcher.resolve(black_box(index))));
        });
    }
    group.finish();
}

/// Benchmark a topic-filtered query over a mixed log
fn bench_query(c: &mut Criterion) {
    let topics = ["/imu", "/gps", "/chatter", "/camera"];
    let log = MessageLog::from_messages((0..100_000i64).map(|i| {
        Message::new(Nanoseconds(i * 10), Vec::<u8>::new(), "Sample", topics[(i % 4) as usize])
    }))
    .unwrap_or_default();

    let options = QueryOptions::all().topic("/imu").range(QualifiedTimeRange::new(
        QualifiedTime::new(Nanoseconds(250_005), Qualifier::OrClosestAfter),
        QualifiedTime::new(Nanoseconds(750_005), Qualifier::OrClosestBefore),
    ));

    c.bench_function("query_topic_window", |b| {
        b.iter(|| black_box(log.query(black_box(&options)).count()));
    });
}

criterion_group!(benches, bench_resolve, bench_query);
criterion_main!(benches);
