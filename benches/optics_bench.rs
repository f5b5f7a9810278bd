//! Criterion benchmarks for candidate evaluation and short evolutionary runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lamp_optics::candidate::Candidate;
use lamp_optics::config::{DesignSpace, EncodingKind, Environment};
use lamp_optics::ga::{EvolutionConfig, EvolutionRunner};
use lamp_optics::light::Distribution;
use lamp_optics::quality::Criterion as Quality;
use lamp_optics::random::create_rng;

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for encoding in [EncodingKind::TwoConnected, EncodingKind::MultipleFree] {
        for rays in [100usize, 1000] {
            let env = Environment::default().with_encoding(encoding);
            let space = DesignSpace::default().with_rays(rays, Distribution::Uniform);
            let candidate = Candidate::random(&env, &space, &mut create_rng(42));
            group.bench_with_input(
                BenchmarkId::new(format!("{encoding:?}"), rays),
                &(env, candidate),
                |b, (env, candidate)| {
                    b.iter(|| {
                        let mut c = candidate.clone();
                        black_box(c.evaluate(black_box(env)))
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for criterion in [Quality::IlluminanceUniformity, Quality::Pareto] {
        let env = Environment::default().with_criterion(criterion);
        let space = DesignSpace::default().with_rays(100, Distribution::Uniform);
        let config = EvolutionConfig::default()
            .with_population_size(20)
            .with_max_generations(10)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(criterion.name(), "p20_g10"),
            &(env, space, config),
            |b, (env, space, config)| {
                b.iter(|| {
                    let result = EvolutionRunner::run(black_box(env), black_box(space), black_box(config));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_run);
criterion_main!(benches);
