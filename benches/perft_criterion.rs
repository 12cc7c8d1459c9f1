use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use magicboard::perft::perft;
use magicboard::{AttackTables, Board};

// Initial-position leaf counts without castling, promotion or en passant.
const START_NODES: &[u64] = &[20, 400, 8902, 197_281];

fn bench_perft(c: &mut Criterion) {
    let tables = AttackTables::shared();

    let mut group = c.benchmark_group("perft_start");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for (depth_idx, expected_nodes) in START_NODES.iter().enumerate() {
        let depth = (depth_idx + 1) as u32;
        let mut board = Board::new(tables.clone());

        // Correctness guard before benchmarking.
        assert_eq!(
            perft(&mut board, depth),
            *expected_nodes,
            "node mismatch in warmup at depth {}",
            depth
        );

        group.throughput(Throughput::Elements(*expected_nodes));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{}", depth)),
            expected_nodes,
            |b, expected| {
                b.iter(|| {
                    let count = perft(black_box(&mut board), black_box(depth));
                    assert_eq!(count, *expected);
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("attack_tables");
    group.sample_size(10);
    group.bench_function("build", |b| b.iter(|| black_box(AttackTables::new())));
    group.finish();
}

criterion_group!(perft_benches, bench_perft, bench_tables);
criterion_main!(perft_benches);
