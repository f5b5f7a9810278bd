//! Parent selection.
//!
//! Single-objective runs use a k-way tournament on each candidate's score
//! (higher is better). Pareto runs use the binary crowded tournament of
//! NSGA-II: lower rank wins, ties go to the larger crowding distance.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

use std::cmp::Ordering;

use rand::Rng;

use super::multi_objective::CrowdedRanking;

/// Tournament selection: pick `k` random contestants, return the index of
/// the highest score.
///
/// # Complexity
/// O(k) per selection
///
/// # Panics
/// Panics if `scores` is empty.
pub fn tournament<R: Rng>(scores: &[f64], k: usize, rng: &mut R) -> usize {
    assert!(!scores.is_empty(), "cannot select from empty population");
    let k = k.max(1);
    let n = scores.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if scores[idx] > scores[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// Binary crowded tournament.
///
/// Two random contestants are compared with the crowded-comparison
/// operator; a full tie is broken by a coin flip.
///
/// # Panics
/// Panics if `ranking` is empty.
pub fn crowded_tournament<R: Rng>(ranking: &CrowdedRanking, rng: &mut R) -> usize {
    let n = ranking.ranks.len();
    assert!(n > 0, "cannot select from empty population");

    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    match ranking.compare(a, b) {
        Ordering::Greater => a,
        Ordering::Less => b,
        Ordering::Equal => {
            if rng.random_bool(0.5) {
                a
            } else {
                b
            }
        }
    }
}
