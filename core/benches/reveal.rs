use criterion::{Criterion, criterion_group, criterion_main};
use sapper_core::*;
use std::hint::black_box;

fn bench_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("reveal");

    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        let start = (config.rows() / 2, config.cols() / 2);
        group.bench_function(difficulty.name(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let mut game = Game::with_seed(config, FirstClick::Safe, seed).unwrap();
                black_box(game.click(black_box(start)).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let config = Difficulty::Expert.config();
    c.bench_function("sample_report_expert_20", |b| {
        b.iter(|| SampleReport::sample(config, black_box(20), 1).unwrap())
    });
}

criterion_group!(benches, bench_reveal, bench_sampling);
criterion_main!(benches);
