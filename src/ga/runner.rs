//! Evolutionary loop execution.
//!
//! [`EvolutionRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → selection → variation → evaluation of
//! changed offspring → replacement → archive update → repeat.
//!
//! Single-objective runs replace the whole generation with its offspring.
//! Pareto runs merge parents and offspring and keep the best
//! `population_size` by non-dominated sorting and crowding distance.

use log::{debug, info};
use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::candidate::Candidate;
use crate::config::{DesignSpace, Environment};
use crate::quality::{Components, OBJECTIVES};
use crate::random::rng_from_option;

use super::archive::Archive;
use super::config::EvolutionConfig;
use super::multi_objective::{crowded_ranking, select_nsga2};
use super::selection::{crowded_tournament, tournament};

/// Summary of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    /// 0 for the initial population.
    pub generation: usize,

    /// Candidates evaluated in this generation.
    pub evaluated: usize,

    /// Fitness of the generation's best candidate (weighted sum in Pareto mode).
    pub best: f64,

    /// Mean fitness over the population (weighted sum in Pareto mode).
    pub average: f64,

    /// Every metric of the generation's best candidate.
    pub components: Components,

    /// Geometry summary of the generation's best candidate.
    pub geometry: String,

    /// Index of the generation's best candidate in the population.
    pub best_index: usize,
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Best-so-far candidate or Pareto front over the whole run.
    pub archive: Archive,

    /// The final population.
    pub population: Vec<Candidate>,

    /// Generations executed after the initial population.
    pub generations: usize,

    /// Statistics of the initial population and every generation.
    pub history: Vec<GenerationStats>,
}

/// Executes the evolutionary loop.
///
/// # Usage
///
/// ```no_run
/// use lamp_optics::config::{DesignSpace, Environment};
/// use lamp_optics::ga::{EvolutionConfig, EvolutionRunner};
///
/// let env = Environment::default();
/// let space = DesignSpace::default();
/// let config = EvolutionConfig::default().with_seed(42);
/// let result = EvolutionRunner::run(&env, &space, &config);
/// println!("best: {:?}", result.archive.best(&env).map(|c| c.summary()));
/// ```
pub struct EvolutionRunner;

impl EvolutionRunner {
    /// Runs the optimization.
    ///
    /// # Panics
    /// Panics if any configuration is invalid (call the `validate` methods
    /// first to get the offending field names).
    pub fn run(env: &Environment, space: &DesignSpace, config: &EvolutionConfig) -> RunResult {
        Self::run_with_observer(env, space, config, |_, _| {})
    }

    /// Runs the optimization, calling `observer` with the statistics and
    /// population of the initial population and of every generation.
    pub fn run_with_observer<F>(
        env: &Environment,
        space: &DesignSpace,
        config: &EvolutionConfig,
        mut observer: F,
    ) -> RunResult
    where
        F: FnMut(&GenerationStats, &[Candidate]),
    {
        config.validate().expect("invalid EvolutionConfig");
        env.validate().expect("invalid Environment");
        space.validate(env.encoding).expect("invalid DesignSpace");

        let mut rng = rng_from_option(config.seed);
        let size = config.population_size;

        // 1. Initialize and evaluate
        let mut population: Vec<Candidate> = (0..size)
            .map(|_| Candidate::random(env, space, &mut rng))
            .collect();
        let evaluated = evaluate_invalid(&mut population, env, config.parallel);

        let mut archive = Archive::for_criterion(env.criterion);
        archive.update(&population, env);

        let mut history = Vec::with_capacity(config.max_generations + 1);
        let stats = generation_stats(0, evaluated, &population, env);
        report(&stats);
        observer(&stats, &population);
        history.push(stats);

        // 2. Evolutionary loop
        for gen in 1..=config.max_generations {
            let mut offspring = select_parents(&population, env, config, &mut rng);
            vary(&mut offspring, space, config, &mut rng);
            let evaluated = evaluate_invalid(&mut offspring, env, config.parallel);

            population = if env.criterion.is_pareto() {
                reduce(population, offspring, env, size)
            } else {
                offspring
            };
            debug_assert_eq!(population.len(), size);
            archive.update(&population, env);

            let stats = generation_stats(gen, evaluated, &population, env);
            report(&stats);
            observer(&stats, &population);
            history.push(stats);
        }

        RunResult {
            archive,
            population,
            generations: config.max_generations,
            history,
        }
    }
}

/// Clones `population_size` parents chosen by tournament.
fn select_parents<R: Rng>(
    population: &[Candidate],
    env: &Environment,
    config: &EvolutionConfig,
    rng: &mut R,
) -> Vec<Candidate> {
    let size = config.population_size;
    if env.criterion.is_pareto() {
        let objectives = weighted_objectives(population, &env.weights);
        let ranking = crowded_ranking(&objectives);
        (0..size)
            .map(|_| population[crowded_tournament(&ranking, rng)].clone())
            .collect()
    } else {
        let scores: Vec<f64> = population.iter().map(|c| c.score(env)).collect();
        (0..size)
            .map(|_| population[tournament(&scores, config.tournament_size, rng)].clone())
            .collect()
    }
}

/// Crosses consecutive pairs, then mutates every offspring.
fn vary<R: Rng>(offspring: &mut [Candidate], space: &DesignSpace, config: &EvolutionConfig, rng: &mut R) {
    for pair in offspring.chunks_exact_mut(2) {
        if rng.random_bool(config.crossover_prob) {
            let (a, b) = pair.split_at_mut(1);
            a[0].crossover(&mut b[0], rng);
        }
    }
    for child in offspring.iter_mut() {
        child.mutate(space, &config.mutation, rng);
    }
}

/// Keeps the best `size` of parents and offspring by NSGA-II selection.
fn reduce(
    parents: Vec<Candidate>,
    offspring: Vec<Candidate>,
    env: &Environment,
    size: usize,
) -> Vec<Candidate> {
    let merged: Vec<Candidate> = parents.into_iter().chain(offspring).collect();
    let objectives = weighted_objectives(&merged, &env.weights);
    let mut keep = vec![false; merged.len()];
    for idx in select_nsga2(&objectives, size) {
        keep[idx] = true;
    }
    merged
        .into_iter()
        .zip(keep)
        .filter_map(|(c, kept)| kept.then_some(c))
        .collect()
}

fn weighted_objectives(population: &[Candidate], weights: &[f64; OBJECTIVES]) -> Vec<[f64; OBJECTIVES]> {
    population
        .iter()
        .map(|c| {
            c.weighted_objectives(weights)
                .unwrap_or([f64::NEG_INFINITY; OBJECTIVES])
        })
        .collect()
}

/// Evaluates every candidate whose fitness is invalid.
///
/// Returns the number of evaluations.
#[cfg(feature = "parallel")]
fn evaluate_invalid(population: &mut [Candidate], env: &Environment, parallel: bool) -> usize {
    if !parallel {
        return evaluate_sequential(population, env);
    }
    let count = population
        .par_iter_mut()
        .filter(|c| !c.fitness().is_valid())
        .map(|c| {
            c.evaluate(env);
            1usize
        })
        .sum();
    debug!("evaluated {count} candidates in parallel");
    count
}

#[cfg(not(feature = "parallel"))]
fn evaluate_invalid(population: &mut [Candidate], env: &Environment, _parallel: bool) -> usize {
    evaluate_sequential(population, env)
}

fn evaluate_sequential(population: &mut [Candidate], env: &Environment) -> usize {
    let mut count = 0;
    for c in population.iter_mut().filter(|c| !c.fitness().is_valid()) {
        c.evaluate(env);
        count += 1;
    }
    debug!("evaluated {count} candidates");
    count
}

fn generation_stats(
    generation: usize,
    evaluated: usize,
    population: &[Candidate],
    env: &Environment,
) -> GenerationStats {
    let best_index = population
        .iter()
        .enumerate()
        .fold(0, |best, (i, c)| {
            if c.score(env) > population[best].score(env) {
                i
            } else {
                best
            }
        });
    let values: Vec<f64> = population
        .iter()
        .filter_map(|c| c.headline(&env.weights))
        .collect();
    let average = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    let best = &population[best_index];

    GenerationStats {
        generation,
        evaluated,
        best: best.headline(&env.weights).unwrap_or(f64::NAN),
        average,
        components: *best.components(),
        geometry: best.summary(),
        best_index,
    }
}

fn report(stats: &GenerationStats) {
    info!(
        "generation {}: best {:.5}, average {:.5}, evaluated {}",
        stats.generation, stats.best, stats.average, stats.evaluated
    );
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EncodingKind;
    use crate::ga::multi_objective::dominates;
    use crate::light::Distribution;
    use crate::quality::Criterion;

    fn small_space() -> DesignSpace {
        DesignSpace::default().with_rays(24, Distribution::Uniform)
    }

    fn small_config(seed: u64) -> EvolutionConfig {
        EvolutionConfig::default()
            .with_population_size(10)
            .with_max_generations(4)
            .with_seed(seed)
            .with_parallel(false)
    }

    #[test]
    fn test_population_size_invariant() {
        for criterion in [Criterion::IlluminanceUniformity, Criterion::Pareto] {
            let env = Environment::default().with_criterion(criterion);
            let config = small_config(1);
            let mut sizes = Vec::new();
            let result = EvolutionRunner::run_with_observer(&env, &small_space(), &config, |stats, pop| {
                sizes.push((stats.generation, pop.len()));
            });
            assert_eq!(sizes.len(), config.max_generations + 1);
            assert!(sizes.iter().all(|&(_, n)| n == config.population_size));
            assert_eq!(result.population.len(), config.population_size);
            assert_eq!(result.history.len(), config.max_generations + 1);
            assert!(result.population.iter().all(|c| c.fitness().is_valid()));
        }
    }

    #[test]
    fn test_initial_generation_evaluates_everyone() {
        let env = Environment::default();
        let result = EvolutionRunner::run(&env, &small_space(), &small_config(2));
        assert_eq!(result.history[0].generation, 0);
        assert_eq!(result.history[0].evaluated, 10);
        assert!(result.history.iter().skip(1).all(|s| s.evaluated <= 10));
    }

    #[test]
    fn test_archive_holds_best_ever() {
        let env = Environment::default().with_criterion(Criterion::Efficiency);
        let result = EvolutionRunner::run(&env, &small_space(), &small_config(3));
        let best = result.archive.best(&env).expect("archive filled");
        let best_score = best.score(&env);
        for stats in &result.history {
            assert!(best_score >= stats.best - 1e-12);
        }
    }

    #[test]
    fn test_minimized_criterion_tracks_lowest() {
        let env = Environment::default().with_criterion(Criterion::LightPollution);
        let result = EvolutionRunner::run(&env, &small_space(), &small_config(4));
        let best = result.archive.best(&env).expect("archive filled");
        let lowest = result
            .history
            .iter()
            .map(|s| s.best)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(best.components().light_pollution, lowest);
    }

    #[test]
    fn test_pareto_archive_front() {
        let env = Environment::default().with_criterion(Criterion::Pareto);
        let result = EvolutionRunner::run(&env, &small_space(), &small_config(5));
        let front = result.archive.members();
        assert!(!front.is_empty());
        for a in front {
            let wa = a.weighted_objectives(&env.weights).expect("evaluated");
            for b in front {
                let wb = b.weighted_objectives(&env.weights).expect("evaluated");
                assert!(!dominates(&wb, &wa));
            }
        }
    }

    #[test]
    fn test_free_segments_run() {
        let env = Environment::default()
            .with_encoding(EncodingKind::MultipleFree)
            .with_criterion(Criterion::WeightedSum);
        let result = EvolutionRunner::run(&env, &small_space(), &small_config(6));
        assert_eq!(result.generations, 4);
        assert!(result.archive.best(&env).is_some());
    }

    #[test]
    fn test_seed_reproducibility() {
        let env = Environment::default().with_criterion(Criterion::WeightedSum);
        let a = EvolutionRunner::run(&env, &small_space(), &small_config(7));
        let b = EvolutionRunner::run(&env, &small_space(), &small_config(7));
        assert_eq!(a.history, b.history);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let env = Environment::default().with_criterion(Criterion::Pareto);
        let sequential = EvolutionRunner::run(&env, &small_space(), &small_config(8));
        let parallel = EvolutionRunner::run(&env, &small_space(), &small_config(8).with_parallel(true));
        assert_eq!(sequential.history, parallel.history);
    }

    #[test]
    #[should_panic(expected = "invalid EvolutionConfig")]
    fn test_invalid_config_panics() {
        let env = Environment::default();
        let config = EvolutionConfig::default().with_population_size(1);
        EvolutionRunner::run(&env, &small_space(), &config);
    }
}
