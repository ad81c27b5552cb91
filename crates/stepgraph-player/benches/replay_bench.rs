//! Benchmarks for recording and replay
//!
//! Measures:
//! - Recording each algorithm on generated graphs
//! - Replaying a finished recording to the end
//! - Building renderer snapshots

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stepgraph_algorithms::Algorithm;
use stepgraph_player::{sample_input, GraphPlayer};

/// Benchmark recording every algorithm on a mid-sized graph
fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    for algorithm in Algorithm::ALL {
        let input = sample_input(algorithm, 40, 9, 42);
        group.bench_with_input(BenchmarkId::from_parameter(algorithm), &input, |b, input| {
            b.iter(|| algorithm.record(black_box(input)))
        });
    }
    group.finish();
}

/// Benchmark full replay at different graph sizes
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_to_end");

    for &n in &[10usize, 40, 160] {
        let input = sample_input(Algorithm::Dijkstra, n, 9, 7);
        let Ok(recording) = Algorithm::Dijkstra.record(&input) else {
            continue;
        };
        group.throughput(Throughput::Elements(recording.events().len() as u64));
        group.bench_with_input(BenchmarkId::new("dijkstra", n), &recording, |b, recording| {
            b.iter(|| {
                let mut player = GraphPlayer::new(recording);
                player.run_to_end(black_box(1))
            })
        });
    }
    group.finish();
}

/// Benchmark snapshot construction for a finished replay
fn bench_snapshot(c: &mut Criterion) {
    let input = sample_input(Algorithm::FloydWarshall, 30, 9, 3);
    let Ok(recording) = Algorithm::FloydWarshall.record(&input) else {
        return;
    };
    let mut player = GraphPlayer::new(&recording);
    if player.run_to_end(1).is_err() {
        return;
    }
    c.bench_function("snapshot_floyd_warshall_30", |b| b.iter(|| black_box(&player).snapshot()));
}

criterion_group!(benches, bench_record, bench_replay, bench_snapshot);
criterion_main!(benches);
