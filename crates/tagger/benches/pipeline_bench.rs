//! 파이프라인 벤치마크
//!
//! 순차 실행과 분할 실행의 처리량을 비교합니다.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowtag_tagger::{LookupRow, LookupTable, TaggerConfigBuilder, TaggingPipeline};

fn flow_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let protocol = match i % 3 {
                0 => "6",
                1 => "17",
                _ => "1",
            };
            format!(
                "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 {} 49153 {protocol} 25 20000 1620140761 1620140821 ACCEPT OK",
                i % 2048
            )
        })
        .collect()
}

fn table() -> LookupTable {
    LookupTable::build((0..1024).map(|port: u32| {
        LookupRow::new(port.to_string(), "tcp", format!("sv_P{}", port % 8))
    }))
}

fn bench_pipeline(c: &mut Criterion) {
    let table = table();
    let lines = flow_lines(10_000);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(lines.len() as u64));

    for workers in [1usize, 2, 4, 8] {
        let config = TaggerConfigBuilder::new()
            .workers(workers)
            .max_skip_warnings(0)
            .build()
            .unwrap();
        let pipeline = TaggingPipeline::new(&table, config);

        group.bench_with_input(BenchmarkId::new("workers", workers), &lines, |b, lines| {
            b.iter(|| pipeline.run_partitioned(black_box(lines)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
