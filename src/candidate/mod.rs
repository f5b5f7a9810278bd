//! Candidate lamp designs.
//!
//! A [`Candidate`] is one lamp: its reflector [`Geometry`], the base the
//! light source sits on, the rays it emits, and everything the last
//! evaluation measured. Genetic operators change the geometry and mark the
//! fitness [`Fitness::Invalid`]; only invalid candidates are re-evaluated.
//!
//! # Submodules
//!
//! - [`operators`]: mutation and crossover operators for both encodings

mod geometry;
pub mod operators;

pub use geometry::{Encoding, FreeSegments, Geometry, TwoConnected};

use rand::Rng;

use crate::config::{DesignSpace, EncodingKind, Environment};
use crate::ga::MutationRates;
use crate::geom::Segment;
use crate::light::{sample, TracedRay};
use crate::quality::{self, Components, Sense, OBJECTIVES};
use crate::reflection::{trace_multiple_free, trace_two_connected};
use crate::road;

/// Result of the most recent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Fitness {
    /// Not evaluated since the last geometry change.
    #[default]
    Invalid,
    /// Single-objective value in the criterion's own units.
    Scalar(f64),
    /// `(efficiency, uniformity, obtrusive_light, light_pollution)`.
    Vector([f64; OBJECTIVES]),
}

impl Fitness {
    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Fitness::Invalid)
    }
}

/// One lamp design and its last evaluation.
#[derive(Debug, Clone)]
pub struct Candidate {
    geometry: Geometry,
    base: Segment,
    rays: Vec<TracedRay>,
    profile: Vec<f64>,
    reflections: usize,
    components: Components,
    fitness: Fitness,
}

impl Candidate {
    /// Candidate with `geometry`, a fresh base and freshly sampled rays.
    pub fn new<R: Rng>(geometry: Geometry, space: &DesignSpace, sections: usize, rng: &mut R) -> Self {
        let tilt = geometry.base_tilt(space);
        Self {
            geometry,
            base: Segment::centered(space.base_length, tilt),
            rays: sample(space.ray_count, space.distribution, tilt, rng),
            profile: vec![0.0; sections],
            reflections: 0,
            components: Components::default(),
            fitness: Fitness::Invalid,
        }
    }

    /// Random candidate in the environment's encoding.
    pub fn random<R: Rng>(env: &Environment, space: &DesignSpace, rng: &mut R) -> Self {
        let geometry = match env.encoding {
            EncodingKind::TwoConnected => Geometry::TwoConnected(TwoConnected::random(space, rng)),
            EncodingKind::MultipleFree => Geometry::FreeSegments(FreeSegments::random(space, rng)),
        };
        Self::new(geometry, space, env.road.sections, rng)
    }

    /// Traces, projects and scores the candidate.
    ///
    /// Rays are reset first, so evaluating twice gives identical results.
    pub fn evaluate(&mut self, env: &Environment) -> Fitness {
        self.reflections = match &self.geometry {
            Geometry::TwoConnected(horn) => {
                let (right, left) = horn.segments(&self.base);
                trace_two_connected(&mut self.rays, &right, &left)
            }
            Geometry::FreeSegments(free) => {
                let reflectors = free.reflectors(&self.base);
                let base_index = reflectors.len() - 1;
                trace_multiple_free(
                    &mut self.rays,
                    &reflectors,
                    base_index,
                    env.reflective_factor,
                    env.reflections_timeout,
                )
            }
        };

        let hits = road::project(&mut self.rays, &env.road, env.cosine_error);
        let hits = road::replicate(&hits, &env.sources, &env.road);
        self.profile = road::bin_into_sections(&hits, &env.road);
        self.components =
            quality::assess(&self.rays, &self.profile, self.reflections, env.sources.count);

        self.fitness = if env.criterion.is_pareto() {
            Fitness::Vector(self.components.objectives())
        } else {
            Fitness::Scalar(self.components.scalar(env.criterion, &env.weights))
        };
        self.fitness
    }

    /// Marks the candidate for re-evaluation.
    #[inline]
    pub fn invalidate(&mut self) {
        self.fitness = Fitness::Invalid;
    }

    /// Applies the encoding's mutations; invalidates on any change.
    ///
    /// A changed base tilt rebuilds the base and resamples the rays.
    pub fn mutate<R: Rng>(&mut self, space: &DesignSpace, rates: &MutationRates, rng: &mut R) -> bool {
        let tilt = self.geometry.base_tilt(space);
        if !self.geometry.mutate(space, rates, rng) {
            return false;
        }
        let new_tilt = self.geometry.base_tilt(space);
        if new_tilt != tilt {
            self.base = Segment::centered(space.base_length, new_tilt);
            self.rays = sample(space.ray_count, space.distribution, new_tilt, rng);
        }
        self.invalidate();
        true
    }

    /// Recombines with `other`; both are invalidated when anything changed.
    pub fn crossover<R: Rng>(&mut self, other: &mut Candidate, rng: &mut R) -> bool {
        if !self.geometry.crossover(&mut other.geometry, rng) {
            return false;
        }
        self.invalidate();
        other.invalidate();
        true
    }

    /// Selection score, higher is better.
    ///
    /// Minimized criteria are negated; vectors score their weighted sum;
    /// invalid candidates score `-inf`.
    pub fn score(&self, env: &Environment) -> f64 {
        match self.fitness {
            Fitness::Invalid => f64::NEG_INFINITY,
            Fitness::Scalar(v) => match env.criterion.sense() {
                Sense::Maximize => v,
                Sense::Minimize => -v,
            },
            Fitness::Vector(v) => quality::weighted_sum(&v, &env.weights),
        }
    }

    /// Fitness as a single reportable number: the scalar itself, or the
    /// weighted sum of a vector.
    pub fn headline(&self, weights: &[f64; OBJECTIVES]) -> Option<f64> {
        match self.fitness {
            Fitness::Invalid => None,
            Fitness::Scalar(v) => Some(v),
            Fitness::Vector(v) => Some(quality::weighted_sum(&v, weights)),
        }
    }

    /// `w_i · f_i` for every objective; Pareto dominance maximizes these.
    pub fn weighted_objectives(&self, weights: &[f64; OBJECTIVES]) -> Option<[f64; OBJECTIVES]> {
        match self.fitness {
            Fitness::Vector(v) => Some(std::array::from_fn(|i| v[i] * weights[i])),
            _ => None,
        }
    }

    #[inline]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn base(&self) -> &Segment {
        &self.base
    }

    /// Reflective segments as traced, base last in free-segment mode.
    pub fn reflectors(&self) -> Vec<Segment> {
        self.geometry.reflectors(&self.base)
    }

    #[inline]
    pub fn rays(&self) -> &[TracedRay] {
        &self.rays
    }

    /// Illuminance per road section; always one entry per section.
    #[inline]
    pub fn profile(&self) -> &[f64] {
        &self.profile
    }

    pub fn normalized_profile(&self) -> Vec<f64> {
        road::normalize(&self.profile)
    }

    #[inline]
    pub fn reflections(&self) -> usize {
        self.reflections
    }

    #[inline]
    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn summary(&self) -> String {
        self.geometry.summary()
    }
}
