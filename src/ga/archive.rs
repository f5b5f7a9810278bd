//! Elitism archive.
//!
//! Keeps the best designs seen over a whole run, independent of what the
//! current population still contains.

use crate::candidate::Candidate;
use crate::config::Environment;
use crate::quality::{Criterion, OBJECTIVES};

use super::multi_objective::non_dominated_sort;

/// Best-so-far candidate (single objective) or Pareto front (Pareto mode).
#[derive(Debug, Clone)]
pub enum Archive {
    Best(Option<Candidate>),
    /// Mutually non-dominated candidates with distinct geometries.
    Front(Vec<Candidate>),
}

impl Archive {
    /// Empty archive matching the criterion.
    pub fn for_criterion(criterion: Criterion) -> Self {
        if criterion.is_pareto() {
            Archive::Front(Vec::new())
        } else {
            Archive::Best(None)
        }
    }

    /// Merges the evaluated members of `population` into the archive.
    pub fn update(&mut self, population: &[Candidate], env: &Environment) {
        match self {
            Archive::Best(best) => {
                let challenger = population
                    .iter()
                    .filter(|c| c.fitness().is_valid())
                    .fold(None::<&Candidate>, |acc, c| match acc {
                        Some(b) if b.score(env) >= c.score(env) => Some(b),
                        _ => Some(c),
                    });
                if let Some(c) = challenger {
                    let improves = match best {
                        None => true,
                        Some(current) => c.score(env) > current.score(env),
                    };
                    if improves {
                        *best = Some(c.clone());
                    }
                }
            }
            Archive::Front(front) => {
                let mut pool = std::mem::take(front);
                for c in population.iter().filter(|c| c.fitness().is_valid()) {
                    if !pool.iter().any(|p| p.geometry().same_design(c.geometry())) {
                        pool.push(c.clone());
                    }
                }
                if pool.is_empty() {
                    return;
                }
                let objectives: Vec<[f64; OBJECTIVES]> = pool
                    .iter()
                    .map(|c| {
                        c.weighted_objectives(&env.weights)
                            .unwrap_or([f64::NEG_INFINITY; OBJECTIVES])
                    })
                    .collect();
                let ranks = non_dominated_sort(&objectives).ranks;
                *front = pool
                    .into_iter()
                    .zip(ranks)
                    .filter(|(_, rank)| *rank == 0)
                    .map(|(c, _)| c)
                    .collect();
            }
        }
    }

    /// The single best member; in Pareto mode the highest weighted sum.
    pub fn best(&self, env: &Environment) -> Option<&Candidate> {
        match self {
            Archive::Best(best) => best.as_ref(),
            Archive::Front(front) => front
                .iter()
                .reduce(|a, b| if b.score(env) > a.score(env) { b } else { a }),
        }
    }

    pub fn members(&self) -> &[Candidate] {
        match self {
            Archive::Best(Some(best)) => std::slice::from_ref(best),
            Archive::Best(None) => &[],
            Archive::Front(front) => front,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{FreeSegments, Geometry, TwoConnected};
    use crate::config::{DesignSpace, EncodingKind};
    use crate::geom::{Point, Segment};
    use crate::ga::multi_objective::dominates;
    use crate::random::create_rng;

    fn evaluated(env: &Environment, seed: u64, count: usize) -> Vec<Candidate> {
        let space = DesignSpace::default().with_rays(24, crate::light::Distribution::Uniform);
        let mut rng = create_rng(seed);
        (0..count)
            .map(|_| {
                let mut c = Candidate::random(env, &space, &mut rng);
                c.evaluate(env);
                c
            })
            .collect()
    }

    #[test]
    fn test_best_keeps_highest_score() {
        let env = Environment::default();
        let population = evaluated(&env, 1, 12);
        let mut archive = Archive::for_criterion(env.criterion);
        assert!(archive.is_empty());
        archive.update(&population, &env);
        let top = population
            .iter()
            .map(|c| c.score(&env))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(archive.best(&env).map(|c| c.score(&env)), Some(top));

        // A worse population never replaces the incumbent.
        let mut worse = population.clone();
        for c in &mut worse {
            c.invalidate();
        }
        archive.update(&worse, &env);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.best(&env).map(|c| c.score(&env)), Some(top));
    }

    #[test]
    fn test_front_is_non_dominated_and_unique() {
        let env = Environment::default().with_criterion(Criterion::Pareto);
        let mut archive = Archive::for_criterion(env.criterion);
        for seed in 0..4 {
            let population = evaluated(&env, seed, 10);
            archive.update(&population, &env);
            // Feeding the same generation twice adds nothing.
            let before = archive.len();
            archive.update(&population, &env);
            assert_eq!(archive.len(), before);
        }

        let members = archive.members();
        assert!(!members.is_empty());
        for (i, a) in members.iter().enumerate() {
            let wa = a.weighted_objectives(&env.weights).expect("evaluated");
            for (j, b) in members.iter().enumerate() {
                if i == j {
                    continue;
                }
                assert!(!a.geometry().same_design(b.geometry()));
                let wb = b.weighted_objectives(&env.weights).expect("evaluated");
                assert!(!dominates(&wb, &wa));
            }
        }
    }

    #[test]
    fn test_front_dedup_ignores_base_tilt() {
        let env = Environment::default()
            .with_encoding(EncodingKind::MultipleFree)
            .with_criterion(Criterion::Pareto);
        let space = DesignSpace::default().with_rays(24, crate::light::Distribution::Uniform);
        let segments = vec![
            Segment::new(Point::new(-300.0, -50.0), Point::new(-100.0, -250.0)),
            Segment::new(Point::new(300.0, -50.0), Point::new(100.0, -250.0)),
        ];
        let mut population: Vec<Candidate> = [0.0, 15.0]
            .into_iter()
            .map(|base_tilt| {
                let free = FreeSegments {
                    segments: segments.clone(),
                    base_tilt,
                };
                Candidate::new(Geometry::FreeSegments(free), &space, env.road.sections, &mut create_rng(5))
            })
            .collect();
        for c in &mut population {
            c.evaluate(&env);
        }
        let mut archive = Archive::for_criterion(env.criterion);
        archive.update(&population, &env);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_front_ignores_invalid() {
        let env = Environment::default().with_criterion(Criterion::Pareto);
        let space = DesignSpace::default();
        let horn = TwoConnected::random(&space, &mut create_rng(2));
        let c = Candidate::new(Geometry::TwoConnected(horn), &space, 16, &mut create_rng(2));
        let mut archive = Archive::for_criterion(env.criterion);
        archive.update(&[c], &env);
        assert!(archive.is_empty());
        assert!(archive.best(&env).is_none());
    }
}
