//! Lighting-quality metrics.
//!
//! Pure functions over traced rays and illuminance profiles. Terminated rays
//! never count towards any metric except as emitted light in the efficiency
//! denominator.
//!
//! # Objective order
//!
//! Weighted sums and Pareto vectors use the fixed order
//! `(efficiency, uniformity, obtrusive_light, light_pollution)`.

use crate::light::TracedRay;

/// Number of objectives in weighted-sum and Pareto mode.
pub const OBJECTIVES: usize = 4;

/// Which metric drives selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Efficiency,
    IlluminanceUniformity,
    GlareReduction,
    ObtrusiveLight,
    LightPollution,
    /// Weighted sum of the four objectives.
    WeightedSum,
    /// The four objectives as a vector, selected by Pareto dominance.
    Pareto,
}

/// Optimization direction of a scalar criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximize,
    Minimize,
}

impl Criterion {
    /// Parses the configuration name, e.g. `"illuminance uniformity"`.
    pub fn parse(name: &str) -> Option<Self> {
        let criterion = match name {
            "efficiency" => Criterion::Efficiency,
            "illuminance uniformity" => Criterion::IlluminanceUniformity,
            "glare reduction" => Criterion::GlareReduction,
            "obtrusive light" => Criterion::ObtrusiveLight,
            "light pollution" => Criterion::LightPollution,
            "weighted sum" => Criterion::WeightedSum,
            "pareto" => Criterion::Pareto,
            _ => return None,
        };
        Some(criterion)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Efficiency => "efficiency",
            Criterion::IlluminanceUniformity => "illuminance uniformity",
            Criterion::GlareReduction => "glare reduction",
            Criterion::ObtrusiveLight => "obtrusive light",
            Criterion::LightPollution => "light pollution",
            Criterion::WeightedSum => "weighted sum",
            Criterion::Pareto => "pareto",
        }
    }

    #[inline]
    pub fn is_pareto(&self) -> bool {
        matches!(self, Criterion::Pareto)
    }

    /// Direction in which the scalar fitness improves.
    ///
    /// Only light pollution (a count of upward rays) is minimized.
    pub fn sense(&self) -> Sense {
        match self {
            Criterion::LightPollution => Sense::Minimize,
            _ => Sense::Maximize,
        }
    }
}

/// Every metric of one evaluated candidate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Components {
    pub efficiency: f64,
    pub uniformity: f64,
    pub glare_reduction: f64,
    pub obtrusive_light: f64,
    pub light_pollution: f64,
}

impl Components {
    /// The four weighted objectives in canonical order.
    pub fn objectives(&self) -> [f64; OBJECTIVES] {
        [
            self.efficiency,
            self.uniformity,
            self.obtrusive_light,
            self.light_pollution,
        ]
    }

    /// The scalar value a single-objective criterion selects on.
    ///
    /// # Panics
    /// Panics for [`Criterion::Pareto`], which has no scalar value.
    pub fn scalar(&self, criterion: Criterion, weights: &[f64; OBJECTIVES]) -> f64 {
        match criterion {
            Criterion::Efficiency => self.efficiency,
            Criterion::IlluminanceUniformity => self.uniformity,
            Criterion::GlareReduction => self.glare_reduction,
            Criterion::ObtrusiveLight => self.obtrusive_light,
            Criterion::LightPollution => self.light_pollution,
            Criterion::WeightedSum => weighted_sum(&self.objectives(), weights),
            Criterion::Pareto => panic!("pareto criterion has no scalar fitness"),
        }
    }
}

/// Share of emitted light still carried by live rays.
///
/// `Σ intensity(live) / Σ original_intensity(all)`, 0 when nothing was
/// emitted.
pub fn efficiency(rays: &[TracedRay]) -> f64 {
    let emitted: f64 = rays.iter().map(|r| r.original_intensity()).sum();
    if emitted <= 0.0 {
        return 0.0;
    }
    let kept: f64 = rays.iter().filter(|r| !r.terminated).map(|r| r.intensity).sum();
    kept / emitted
}

/// Ratio of the darkest to the brightest road section, 0 for a dark road.
pub fn illuminance_uniformity(profile: &[f64]) -> f64 {
    let max = profile.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max <= 0.0 {
        return 0.0;
    }
    let min = profile.iter().cloned().fold(f64::INFINITY, f64::min);
    (min / max).clamp(0.0, 1.0)
}

/// Glare reduction score: the total number of reflections.
///
/// More reflections diffuse the source image, so higher is better.
#[inline]
pub fn glare_reduction(reflections: usize) -> f64 {
    reflections as f64
}

/// Negative share of live light that misses the road.
///
/// `-Σ intensity(live, no road hit) / (Σ intensity(live) · sources)`; 0 when
/// no light is left.
pub fn obtrusive_light(rays: &[TracedRay], sources: usize) -> f64 {
    let live = || rays.iter().filter(|r| !r.terminated);
    let total: f64 = live().map(|r| r.intensity).sum();
    let denom = total * sources.max(1) as f64;
    if denom <= 0.0 {
        return 0.0;
    }
    let missed: f64 = live().filter(|r| r.road_hit.is_none()).map(|r| r.intensity).sum();
    -missed / denom
}

/// Number of live rays whose final element points upward.
pub fn light_pollution(rays: &[TracedRay]) -> usize {
    rays.iter()
        .filter(|r| !r.terminated && r.ends_upward())
        .count()
}

/// `Σ weight_i · objective_i`.
#[inline]
pub fn weighted_sum(objectives: &[f64; OBJECTIVES], weights: &[f64; OBJECTIVES]) -> f64 {
    objectives.iter().zip(weights).map(|(o, w)| o * w).sum()
}

/// Computes every metric for a traced and projected ray set.
pub fn assess(
    rays: &[TracedRay],
    profile: &[f64],
    reflections: usize,
    sources: usize,
) -> Components {
    Components {
        efficiency: efficiency(rays),
        uniformity: illuminance_uniformity(profile),
        glare_reduction: glare_reduction(reflections),
        obtrusive_light: obtrusive_light(rays, sources),
        light_pollution: light_pollution(rays) as f64,
    }
}
