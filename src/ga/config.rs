//! Evolution configuration.
//!
//! [`EvolutionConfig`] holds all parameters that control the evolutionary loop.

use crate::config::ConfigError;

/// Per-operator mutation probabilities.
///
/// Each operator fires independently with its own probability. The first
/// two apply to two-connected candidates, the rest to multiple-free ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationRates {
    pub angle: f64,
    pub length: f64,
    pub shift: f64,
    pub rotate: f64,
    pub resize: f64,
    pub tilt: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            angle: 0.3,
            length: 0.3,
            shift: 0.2,
            rotate: 0.2,
            resize: 0.1,
            tilt: 0.05,
        }
    }
}

impl MutationRates {
    /// Sets every rate to `rate`.
    pub fn uniform(rate: f64) -> Self {
        let rate = rate.clamp(0.0, 1.0);
        Self {
            angle: rate,
            length: rate,
            shift: rate,
            rotate: rate,
            resize: rate,
            tilt: rate,
        }
    }

    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("evolution.angle_mutation_prob", self.angle),
            ("evolution.length_mutation_prob", self.length),
            ("evolution.shift_prob", self.shift),
            ("evolution.rotate_prob", self.rotate),
            ("evolution.resize_prob", self.resize),
            ("evolution.tilt_prob", self.tilt),
        ]
    }
}

/// Configuration for the evolutionary loop.
///
/// # Defaults
///
/// ```
/// use lamp_optics::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 40);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use lamp_optics::ga::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population_size(80)
///     .with_tournament_size(5)
///     .with_crossover_prob(0.6)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Number of candidates kept in every generation.
    pub population_size: usize,

    /// Generations to run after the initial population.
    pub max_generations: usize,

    /// Contestants per tournament in single-objective mode.
    pub tournament_size: usize,

    /// Probability of crossing a consecutive pair of offspring (0.0–1.0).
    pub crossover_prob: f64,

    pub mutation: MutationRates,

    /// Whether to evaluate candidates in parallel using rayon.
    ///
    /// Evaluation draws no random numbers, so results do not depend on it.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 40,
            tournament_size: 3,
            crossover_prob: 0.5,
            mutation: MutationRates::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation probabilities.
    pub fn with_mutation_rates(mut self, rates: MutationRates) -> Self {
        self.mutation = rates;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Names of every invalid field, in parameter-file notation.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if self.population_size < 2 {
            invalid.push("evolution.population");
        }
        if self.max_generations == 0 {
            invalid.push("evolution.generations");
        }
        if self.tournament_size == 0 {
            invalid.push("evolution.tournament_size");
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            invalid.push("evolution.crossover_prob");
        }
        for (name, rate) in self.mutation.named() {
            if !(0.0..=1.0).contains(&rate) {
                invalid.push(name);
            }
        }
        invalid
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::from_fields(self.invalid_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.max_generations, 40);
        assert_eq!(config.tournament_size, 3);
        assert!((config.crossover_prob - 0.5).abs() < 1e-10);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EvolutionConfig::default()
            .with_population_size(200)
            .with_max_generations(10)
            .with_tournament_size(4)
            .with_crossover_prob(0.8)
            .with_mutation_rates(MutationRates::uniform(0.25))
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 10);
        assert_eq!(config.tournament_size, 4);
        assert!((config.crossover_prob - 0.8).abs() < 1e-10);
        assert!((config.mutation.tilt - 0.25).abs() < 1e-10);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = EvolutionConfig::default().with_population_size(1);
        assert_eq!(config.invalid_fields(), vec!["evolution.population"]);
    }

    #[test]
    fn test_validate_zero_generations_and_tournament() {
        let config = EvolutionConfig::default()
            .with_max_generations(0)
            .with_tournament_size(0);
        assert_eq!(
            config.invalid_fields(),
            vec!["evolution.generations", "evolution.tournament_size"]
        );
    }

    #[test]
    fn test_validate_probability_out_of_range() {
        let mut config = EvolutionConfig::default();
        config.mutation.shift = 1.5;
        config.crossover_prob = -0.1;
        assert_eq!(
            config.invalid_fields(),
            vec!["evolution.crossover_prob", "evolution.shift_prob"]
        );
    }

    #[test]
    fn test_clamp_rates() {
        let config = EvolutionConfig::default().with_crossover_prob(2.0);
        assert!((config.crossover_prob - 1.0).abs() < 1e-10);
        assert_eq!(MutationRates::uniform(-1.0), MutationRates::uniform(0.0));
    }
}
