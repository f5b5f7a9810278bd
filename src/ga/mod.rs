//! Evolutionary optimizer.
//!
//! Evolves a population of [`Candidate`](crate::candidate::Candidate) lamp
//! designs for a fixed number of generations, either on one scalar
//! criterion or on four objectives at once (Pareto mode).
//!
//! # Key Types
//!
//! - [`EvolutionConfig`]: Algorithm parameters (population size, tournament, rates)
//! - [`EvolutionRunner`]: Executes the evolutionary loop
//! - [`Archive`]: Best-so-far candidate or Pareto front
//! - [`RunResult`], [`GenerationStats`]: Final result and per-generation statistics
//!
//! # Submodules
//!
//! - [`multi_objective`]: Pareto non-dominated sorting, crowding distance and
//!   NSGA-II environmental selection
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod archive;
mod config;
pub mod multi_objective;
mod runner;
mod selection;

pub use archive::Archive;
pub use config::{EvolutionConfig, MutationRates};
pub use runner::{EvolutionRunner, GenerationStats, RunResult};
pub use selection::{crowded_tournament, tournament};
