//! Run configuration.
//!
//! Three immutable values describe a run:
//!
//! - [`Environment`]: how candidates are scored
//! - [`DesignSpace`]: how candidates are built and mutated
//! - [`EvolutionConfig`](crate::ga::EvolutionConfig): how the population evolves
//!
//! [`Parameters`] is the raw JSON parameter file. [`Parameters::build`]
//! checks every field and either returns a complete [`Experiment`] or a
//! [`ConfigError::InvalidFields`] naming all offending fields at once.
//!
//! # Parameter file
//!
//! Every section and field is optional and falls back to its default.
//!
//! ```json
//! {
//!   "road": { "start": 0, "end": 8000, "depth": -4000, "sections": 16 },
//!   "led": { "rays": 100, "distribution": "uniform", "base_length": 100 },
//!   "reflectors": { "configuration": "two connected" },
//!   "evolution": { "population": 50, "generations": 40 },
//!   "evaluation": { "criterion": "pareto", "weights": [1, 1, 1, -1] },
//!   "seed": 42
//! }
//! ```

mod design;
mod environment;

pub use design::{DesignSpace, FreeBounds, HornBounds};
pub use environment::{EncodingKind, Environment};

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ga::{EvolutionConfig, MutationRates};
use crate::light::Distribution;
use crate::quality::{Criterion, OBJECTIVES};
use crate::road::{Road, SourceLayout, Sources};

/// Errors raised while loading a parameter file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed parameter file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid parameters: {}", .0.join(", "))]
    InvalidFields(Vec<String>),
}

impl ConfigError {
    pub(crate) fn from_fields(fields: Vec<&'static str>) -> Result<(), ConfigError> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidFields(
                fields.into_iter().map(String::from).collect(),
            ))
        }
    }

    /// Offending field names, empty for I/O and parse errors.
    pub fn fields(&self) -> &[String] {
        match self {
            ConfigError::InvalidFields(fields) => fields,
            _ => &[],
        }
    }
}

/// Everything a run needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub environment: Environment,
    pub design: DesignSpace,
    pub evolution: EvolutionConfig,
}

/// `road` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoadParams {
    pub start: f64,
    pub end: f64,
    pub depth: f64,
    pub sections: i64,
}

impl Default for RoadParams {
    fn default() -> Self {
        let road = Environment::default().road;
        Self {
            start: road.start,
            end: road.end,
            depth: road.depth,
            sections: road.sections as i64,
        }
    }
}

/// `led` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedParams {
    pub rays: i64,
    pub distribution: String,
    pub base_length: f64,
    pub base_slope: f64,
}

impl Default for LedParams {
    fn default() -> Self {
        let space = DesignSpace::default();
        Self {
            rays: space.ray_count as i64,
            distribution: "uniform".into(),
            base_length: space.base_length,
            base_slope: space.base_slope,
        }
    }
}

/// `reflectors` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReflectorParams {
    pub configuration: String,
    pub angle_lower_bound: f64,
    pub angle_upper_bound: f64,
    pub angle_step: f64,
    pub length_lower_bound: f64,
    pub length_upper_bound: f64,
    pub length_step: f64,
    pub segments: i64,
    pub distance_limit: f64,
    pub length_limit: f64,
    pub shift_step: f64,
    pub rotate_step: f64,
    pub resize_lower: f64,
    pub resize_upper: f64,
    pub tilt_lower: f64,
    pub tilt_upper: f64,
    pub tilt_step: f64,
}

impl Default for ReflectorParams {
    fn default() -> Self {
        let horn = HornBounds::default();
        let free = FreeBounds::default();
        Self {
            configuration: "two connected".into(),
            angle_lower_bound: horn.angle_lower,
            angle_upper_bound: horn.angle_upper,
            angle_step: horn.angle_step,
            length_lower_bound: horn.length_lower,
            length_upper_bound: horn.length_upper,
            length_step: horn.length_step,
            segments: free.segment_count as i64,
            distance_limit: free.distance_limit,
            length_limit: free.length_limit,
            shift_step: free.shift_step,
            rotate_step: free.rotate_step,
            resize_lower: free.resize_lower,
            resize_upper: free.resize_upper,
            tilt_lower: free.tilt_lower,
            tilt_upper: free.tilt_upper,
            tilt_step: free.tilt_step,
        }
    }
}

/// `evolution` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionParams {
    pub population: i64,
    pub generations: i64,
    pub tournament_size: i64,
    pub crossover_prob: f64,
    pub angle_mutation_prob: f64,
    pub length_mutation_prob: f64,
    pub shift_prob: f64,
    pub rotate_prob: f64,
    pub resize_prob: f64,
    pub tilt_prob: f64,
    pub parallel: bool,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        let config = EvolutionConfig::default();
        let rates = config.mutation;
        Self {
            population: config.population_size as i64,
            generations: config.max_generations as i64,
            tournament_size: config.tournament_size as i64,
            crossover_prob: config.crossover_prob,
            angle_mutation_prob: rates.angle,
            length_mutation_prob: rates.length,
            shift_prob: rates.shift,
            rotate_prob: rates.rotate,
            resize_prob: rates.resize,
            tilt_prob: rates.tilt,
            parallel: config.parallel,
        }
    }
}

/// `evaluation` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationParams {
    pub criterion: String,
    pub cosine_error: bool,
    pub reflective_factor: f64,
    pub reflections_timeout: i64,
    pub sources: i64,
    pub modification: String,
    pub separating_distance: f64,
    pub weights: Vec<f64>,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            criterion: env.criterion.name().into(),
            cosine_error: env.cosine_error,
            reflective_factor: env.reflective_factor,
            reflections_timeout: env.reflections_timeout as i64,
            sources: env.sources.count as i64,
            modification: String::new(),
            separating_distance: env.sources.separating_distance,
            weights: env.weights.to_vec(),
        }
    }
}

/// The raw parameter file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub road: RoadParams,
    pub led: LedParams,
    pub reflectors: ReflectorParams,
    pub evolution: EvolutionParams,
    pub evaluation: EvaluationParams,
    pub seed: Option<u64>,
}

/// Converts a count, recording `field` when it is not positive.
fn positive(value: i64, field: &'static str, invalid: &mut Vec<&'static str>) -> usize {
    if value <= 0 {
        invalid.push(field);
        0
    } else {
        value as usize
    }
}

impl Parameters {
    /// Reads and parses a parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates every field and assembles the run configuration.
    ///
    /// All invalid fields are reported together.
    pub fn build(&self) -> Result<Experiment, ConfigError> {
        let mut invalid = Vec::new();

        let sections = positive(self.road.sections, "road.sections", &mut invalid);
        let ray_count = positive(self.led.rays, "led.rays", &mut invalid);
        let population = positive(self.evolution.population, "evolution.population", &mut invalid);
        let generations = positive(self.evolution.generations, "evolution.generations", &mut invalid);
        let tournament_size = positive(
            self.evolution.tournament_size,
            "evolution.tournament_size",
            &mut invalid,
        );
        let timeout = positive(
            self.evaluation.reflections_timeout,
            "evaluation.reflections_timeout",
            &mut invalid,
        );
        let source_count = positive(self.evaluation.sources, "evaluation.sources", &mut invalid);

        let distribution = Distribution::parse(&self.led.distribution).unwrap_or_else(|| {
            invalid.push("led.distribution");
            Distribution::Uniform
        });
        let encoding = EncodingKind::parse(&self.reflectors.configuration).unwrap_or_else(|| {
            invalid.push("reflectors.configuration");
            EncodingKind::TwoConnected
        });
        let criterion = Criterion::parse(&self.evaluation.criterion).unwrap_or_else(|| {
            invalid.push("evaluation.criterion");
            Criterion::IlluminanceUniformity
        });
        let mut layout = SourceLayout::parse(&self.evaluation.modification).unwrap_or_else(|| {
            invalid.push("evaluation.modification");
            SourceLayout::Single
        });
        if layout == SourceLayout::Mirror && source_count == 1 {
            warn!("mirror modification needs two sources; using a single source");
            layout = SourceLayout::Single;
        }
        let weights: [f64; OBJECTIVES] = match self.evaluation.weights.as_slice().try_into() {
            Ok(weights) => weights,
            Err(_) => {
                invalid.push("evaluation.weights");
                [0.0; OBJECTIVES]
            }
        };

        let environment = Environment {
            road: Road::new(self.road.start, self.road.end, self.road.depth, sections),
            reflective_factor: self.evaluation.reflective_factor,
            cosine_error: self.evaluation.cosine_error,
            reflections_timeout: timeout,
            encoding,
            sources: Sources {
                count: source_count,
                layout,
                separating_distance: self.evaluation.separating_distance,
            },
            criterion,
            weights,
        };

        let r = &self.reflectors;
        let design = DesignSpace {
            ray_count,
            distribution,
            base_length: self.led.base_length,
            base_slope: self.led.base_slope,
            horn: HornBounds {
                angle_lower: r.angle_lower_bound,
                angle_upper: r.angle_upper_bound,
                angle_step: r.angle_step,
                length_lower: r.length_lower_bound,
                length_upper: r.length_upper_bound,
                length_step: r.length_step,
            },
            free: FreeBounds {
                segment_count: r.segments.max(0) as usize,
                distance_limit: r.distance_limit,
                length_limit: r.length_limit,
                shift_step: r.shift_step,
                rotate_step: r.rotate_step,
                resize_lower: r.resize_lower,
                resize_upper: r.resize_upper,
                tilt_lower: r.tilt_lower,
                tilt_upper: r.tilt_upper,
                tilt_step: r.tilt_step,
            },
        };

        let e = &self.evolution;
        let evolution = EvolutionConfig {
            population_size: population,
            max_generations: generations,
            tournament_size,
            crossover_prob: e.crossover_prob,
            mutation: MutationRates {
                angle: e.angle_mutation_prob,
                length: e.length_mutation_prob,
                shift: e.shift_prob,
                rotate: e.rotate_prob,
                resize: e.resize_prob,
                tilt: e.tilt_prob,
            },
            parallel: e.parallel,
            seed: self.seed,
        };

        // Counts already rejected above would be reported twice.
        for field in environment
            .invalid_fields()
            .into_iter()
            .chain(design.invalid_fields(encoding))
            .chain(evolution.invalid_fields())
        {
            if !invalid.contains(&field) {
                invalid.push(field);
            }
        }

        ConfigError::from_fields(invalid)?;
        Ok(Experiment {
            environment,
            design,
            evolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(json: &str) -> Vec<String> {
        let params = Parameters::from_json(json).expect("parses");
        match params.build() {
            Err(err) => err.fields().to_vec(),
            Ok(_) => Vec::new(),
        }
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let experiment = Parameters::from_json("{}").expect("parses").build().expect("valid");
        assert_eq!(experiment.environment, Environment::default());
        assert_eq!(experiment.design, DesignSpace::default());
        assert_eq!(experiment.evolution, EvolutionConfig::default());
    }

    #[test]
    fn test_full_file() {
        let json = r#"{
            "road": { "start": -2000, "end": 6000, "depth": -3000, "sections": 8 },
            "led": { "rays": 64, "distribution": "random", "base_length": 80, "base_slope": 5 },
            "reflectors": { "configuration": "multiple free", "segments": 6 },
            "evolution": { "population": 30, "generations": 12, "tournament_size": 4,
                           "crossover_prob": 0.7, "parallel": false },
            "evaluation": { "criterion": "pareto", "cosine_error": true,
                            "reflective_factor": 0.8, "reflections_timeout": 15,
                            "sources": 3, "modification": "shift",
                            "separating_distance": 250, "weights": [1, 2, 1, -1] },
            "seed": 9
        }"#;
        let experiment = Parameters::from_json(json).expect("parses").build().expect("valid");
        let env = &experiment.environment;
        assert_eq!(env.road, Road::new(-2000.0, 6000.0, -3000.0, 8));
        assert_eq!(env.encoding, EncodingKind::MultipleFree);
        assert_eq!(env.criterion, Criterion::Pareto);
        assert_eq!(env.sources.layout, SourceLayout::Shift);
        assert_eq!(env.sources.count, 3);
        assert_eq!(env.weights, [1.0, 2.0, 1.0, -1.0]);
        assert!(env.cosine_error);
        assert_eq!(experiment.design.ray_count, 64);
        assert_eq!(experiment.design.distribution, Distribution::Random);
        assert_eq!(experiment.design.free.segment_count, 6);
        assert_eq!(experiment.evolution.population_size, 30);
        assert_eq!(experiment.evolution.seed, Some(9));
        assert!(!experiment.evolution.parallel);
    }

    #[test]
    fn test_reports_every_invalid_field() {
        let json = r#"{
            "road": { "start": 100, "end": 50, "depth": 10, "sections": 0 },
            "led": { "rays": -1 },
            "evolution": { "population": 0, "crossover_prob": 1.5 },
            "evaluation": { "criterion": "brightness", "reflective_factor": 0,
                            "weights": [1, 1] }
        }"#;
        let fields = invalid(json);
        for expected in [
            "road.end",
            "road.depth",
            "road.sections",
            "led.rays",
            "evolution.population",
            "evolution.crossover_prob",
            "evaluation.criterion",
            "evaluation.reflective_factor",
            "evaluation.weights",
        ] {
            assert!(fields.iter().any(|f| f == expected), "missing {expected} in {fields:?}");
        }
        let mut deduped = fields.clone();
        deduped.dedup();
        assert_eq!(deduped.len(), fields.len());
    }

    #[test]
    fn test_unknown_names_rejected() {
        let fields = invalid(
            r#"{ "reflectors": { "configuration": "three connected" },
                 "led": { "distribution": "gaussian" },
                 "evaluation": { "modification": "rotate" } }"#,
        );
        assert_eq!(
            fields,
            vec!["led.distribution", "reflectors.configuration", "evaluation.modification"]
        );
    }

    #[test]
    fn test_mirror_source_count() {
        let fields = invalid(r#"{ "evaluation": { "sources": 3, "modification": "mirror" } }"#);
        assert_eq!(fields, vec!["evaluation.modification"]);

        let experiment = Parameters::from_json(
            r#"{ "evaluation": { "sources": 1, "modification": "mirror" } }"#,
        )
        .expect("parses")
        .build()
        .expect("valid");
        assert_eq!(experiment.environment.sources.layout, SourceLayout::Single);
    }

    #[test]
    fn test_free_segments_checked_only_in_free_mode() {
        assert!(invalid(r#"{ "reflectors": { "segments": 0 } }"#).is_empty());
        assert_eq!(
            invalid(r#"{ "reflectors": { "configuration": "multiple free", "segments": 0 } }"#),
            vec!["reflectors.segments"]
        );
    }

    #[test]
    fn test_malformed_and_unknown_fields() {
        assert!(matches!(Parameters::from_json("{ road: }"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            Parameters::from_json(r#"{ "road": { "lanes": 2 } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Parameters::load("/nonexistent/lamp-optics.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.fields().is_empty());
    }

    #[test]
    fn test_error_message_lists_fields() {
        let err = ConfigError::InvalidFields(vec!["road.end".into(), "led.rays".into()]);
        assert_eq!(err.to_string(), "invalid parameters: road.end, led.rays");
    }
}
