use criterion::{Criterion, criterion_group, criterion_main};
use minado_core::{Difficulty, GridGenerator, PlayEngine, RandomGridGenerator};
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        let center = (config.side() / 2, config.side() / 2);
        group.bench_function(difficulty.label(), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                RandomGridGenerator::with_safe_start(black_box(seed), center)
                    .generate(config)
                    .ok()
            })
        });
    }
    group.finish();
}

fn bench_first_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_reveal");
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        let start = (0, 0);
        let Ok(grid) = RandomGridGenerator::with_safe_start(42, start).generate(config) else {
            continue;
        };
        group.bench_function(difficulty.label(), |b| {
            b.iter(|| {
                let mut engine = PlayEngine::new(grid.clone());
                black_box(engine.reveal(start).ok())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_first_reveal);
criterion_main!(benches);
