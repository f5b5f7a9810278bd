//! Evaluation environment.
//!
//! [`Environment`] holds everything that decides how a candidate is scored:
//! the road, the optics material, the tracing limits, the lamp's source
//! layout and the quality criterion. It is created once per run and only
//! read afterwards, so it can be shared freely between evaluation workers.

use crate::quality::{Criterion, OBJECTIVES};
use crate::road::{Road, SourceLayout, Sources};

use super::ConfigError;

/// Which reflector encoding candidates use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingKind {
    /// Two reflectors hinged on the base corners.
    #[default]
    TwoConnected,
    /// A free list of reflectors plus a tiltable base.
    MultipleFree,
}

impl EncodingKind {
    /// Parses the configuration name (`"two connected"` or `"multiple free"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "two connected" => Some(EncodingKind::TwoConnected),
            "multiple free" => Some(EncodingKind::MultipleFree),
            _ => None,
        }
    }
}

/// Immutable per-run evaluation parameters.
///
/// # Defaults
///
/// ```
/// use lamp_optics::config::Environment;
///
/// let env = Environment::default();
/// assert_eq!(env.road.sections, 16);
/// assert!(env.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use lamp_optics::config::{EncodingKind, Environment};
/// use lamp_optics::quality::Criterion;
///
/// let env = Environment::default()
///     .with_encoding(EncodingKind::MultipleFree)
///     .with_criterion(Criterion::Pareto)
///     .with_reflective_factor(0.85)
///     .with_cosine_error(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub road: Road,

    /// Fraction of intensity kept per reflection, in `(0, 1]`.
    pub reflective_factor: f64,

    /// Whether road hits are weighted by the sine of the incidence angle.
    pub cosine_error: bool,

    /// Maximum reflections per ray in multiple-free mode.
    pub reflections_timeout: usize,

    pub encoding: EncodingKind,

    pub sources: Sources,

    pub criterion: Criterion,

    /// Weights of `(efficiency, uniformity, obtrusive_light, light_pollution)`.
    ///
    /// Used by the weighted sum, and by Pareto mode where each sign sets the
    /// direction of its objective.
    pub weights: [f64; OBJECTIVES],
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            road: Road::new(0.0, 8000.0, -4000.0, 16),
            reflective_factor: 0.9,
            cosine_error: false,
            reflections_timeout: 20,
            encoding: EncodingKind::TwoConnected,
            sources: Sources::default(),
            criterion: Criterion::IlluminanceUniformity,
            weights: [1.0, 1.0, 1.0, -1.0],
        }
    }
}

impl Environment {
    pub fn with_road(mut self, road: Road) -> Self {
        self.road = road;
        self
    }

    pub fn with_reflective_factor(mut self, factor: f64) -> Self {
        self.reflective_factor = factor;
        self
    }

    pub fn with_cosine_error(mut self, enabled: bool) -> Self {
        self.cosine_error = enabled;
        self
    }

    pub fn with_reflections_timeout(mut self, timeout: usize) -> Self {
        self.reflections_timeout = timeout;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingKind) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_sources(mut self, count: usize, layout: SourceLayout, separating_distance: f64) -> Self {
        self.sources = Sources {
            count,
            layout,
            separating_distance,
        };
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_weights(mut self, weights: [f64; OBJECTIVES]) -> Self {
        self.weights = weights;
        self
    }

    /// Names of every invalid field, in parameter-file notation.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        let road = &self.road;
        if !(road.start.is_finite() && road.end.is_finite()) || road.end <= road.start {
            invalid.push("road.end");
        }
        if !road.depth.is_finite() || road.depth >= 0.0 {
            invalid.push("road.depth");
        }
        if road.sections == 0 {
            invalid.push("road.sections");
        }
        if !(self.reflective_factor > 0.0 && self.reflective_factor <= 1.0) {
            invalid.push("evaluation.reflective_factor");
        }
        if self.reflections_timeout == 0 {
            invalid.push("evaluation.reflections_timeout");
        }
        if self.sources.count == 0 {
            invalid.push("evaluation.sources");
        }
        if self.sources.layout == SourceLayout::Mirror && self.sources.count > 2 {
            invalid.push("evaluation.modification");
        }
        if !self.sources.separating_distance.is_finite() {
            invalid.push("evaluation.separating_distance");
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            invalid.push("evaluation.weights");
        }
        invalid
    }

    /// Validates the environment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::from_fields(self.invalid_fields())
    }
}
