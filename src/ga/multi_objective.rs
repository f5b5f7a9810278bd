//! Multi-objective optimization utilities.
//!
//! NSGA-II building blocks over objective vectors that are all
//! **maximized**. Callers orient each objective first (the runner multiplies
//! every objective by its weight, so a negative weight turns a quantity to
//! minimize into one to maximize).
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//! - [`crowded_ranking`]: Rank and front-local crowding distance of every solution
//! - [`select_nsga2`]: Environmental selection of the `k` best solutions
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **maximized**: higher values are better.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use lamp_optics::ga::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     [5.0, 1.0],  // Solution A
///     [3.0, 3.0],  // Solution B
///     [1.0, 5.0],  // Solution C
///     [2.0, 2.0],  // Solution D — dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort<V: AsRef<[f64]>>(objectives: &[V]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(objectives[i].as_ref(), objectives[j].as_ref()) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    // Build subsequent fronts
    let mut fronts = vec![front_0];
    loop {
        let current = fronts.last().expect("fronts is initialized with front_0; never empty");
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Dominance comparison result.
#[derive(Debug, PartialEq)]
enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compare two solutions for Pareto dominance (maximization).
fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va > vb {
            a_better_in_some = true;
        } else if vb > va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Whether `a` is at least as good as `b` everywhere and better somewhere.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use lamp_optics::ga::multi_objective::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!(distances[1].is_finite());
/// ```
pub fn crowding_distance<V: AsRef<[f64]>>(objectives: &[V]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let value = |i: usize, obj: usize| objectives[i].as_ref()[obj];
    let m = objectives[0].as_ref().len();
    let mut distances = vec![0.0f64; n];

    for obj in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| value(a, obj).partial_cmp(&value(b, obj)).unwrap_or(Ordering::Equal));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = value(indices[n - 1], obj) - value(indices[0], obj);
        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = value(indices[i - 1], obj);
                let next = value(indices[i + 1], obj);
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Pareto rank and front-local crowding distance of every solution.
#[derive(Debug, Clone)]
pub struct CrowdedRanking {
    pub ranks: Vec<usize>,
    pub distances: Vec<f64>,
    pub fronts: Vec<Vec<usize>>,
}

impl CrowdedRanking {
    /// Crowded-comparison operator: lower rank wins, then larger distance.
    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.ranks[b].cmp(&self.ranks[a]).then(
            self.distances[a]
                .partial_cmp(&self.distances[b])
                .unwrap_or(Ordering::Equal),
        )
    }
}

/// Sorts into fronts and assigns crowding distances within each front.
pub fn crowded_ranking<V: AsRef<[f64]>>(objectives: &[V]) -> CrowdedRanking {
    let sorted = non_dominated_sort(objectives);
    let mut distances = vec![0.0; objectives.len()];
    for front in &sorted.fronts {
        let members: Vec<&[f64]> = front.iter().map(|&i| objectives[i].as_ref()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&members)) {
            distances[i] = d;
        }
    }
    CrowdedRanking {
        ranks: sorted.ranks,
        distances,
        fronts: sorted.fronts,
    }
}

/// NSGA-II environmental selection.
///
/// Fills the result front by front; the first front that does not fit is
/// cut by descending crowding distance. Returns at most `k` indices.
pub fn select_nsga2<V: AsRef<[f64]>>(objectives: &[V], k: usize) -> Vec<usize> {
    let ranking = crowded_ranking(objectives);
    let mut chosen = Vec::with_capacity(k);

    for front in &ranking.fronts {
        if chosen.len() + front.len() <= k {
            chosen.extend_from_slice(front);
            continue;
        }
        let mut rest = front.clone();
        rest.sort_by(|&a, &b| {
            ranking.distances[b]
                .partial_cmp(&ranking.distances[a])
                .unwrap_or(Ordering::Equal)
        });
        let room = k - chosen.len();
        chosen.extend(rest.into_iter().take(room));
        break;
    }
    chosen
}

// ============================================================================
// Tests
// ============================================================================
