//! Light source sampling and traced rays.
//!
//! The lamp is a point source at the origin sitting on a base segment. It
//! emits a fixed set of rays into the half-plane below the base; each ray
//! carries a Lambertian intensity that falls off towards the base plane.
//!
//! A [`TracedRay`] owns its whole life: the emission ray, the intensity it
//! started with, the current (attenuated) intensity, the polyline it has
//! travelled and where it met the road.

use crate::geom::{Point, Ray, Segment};
use rand::Rng;

/// Distance from the source at which the second point of an emitted ray is
/// placed. Only the direction matters.
pub const EMISSION_REACH: f64 = 10_000.0;

/// Angular distribution of emitted rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Evenly spaced over the half-plane, offset by half a step.
    Uniform,
    /// Independently drawn from the half-plane.
    Random,
}

impl Distribution {
    /// Parses the configuration name (`"uniform"` or `"random"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "uniform" => Some(Distribution::Uniform),
            "random" => Some(Distribution::Random),
            _ => None,
        }
    }
}

/// Lambertian intensity of a ray emitted at `angle` degrees from a base
/// tilted `base_tilt` degrees.
#[inline]
pub fn lambertian(angle: f64, base_tilt: f64) -> f64 {
    (angle - base_tilt).abs().to_radians().sin().abs()
}

/// The polyline travelled by a ray.
///
/// Finished legs are segments; the last element is an open ray. A bounce
/// closes the open ray at the hit point and continues from there, so
/// consecutive elements always share an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RayPath {
    legs: Vec<Segment>,
    tail: Ray,
}

impl RayPath {
    pub fn new(start: Ray) -> Self {
        Self {
            legs: Vec::new(),
            tail: start,
        }
    }

    /// The open ray the path currently ends with.
    #[inline]
    pub fn tail(&self) -> &Ray {
        &self.tail
    }

    /// Finished legs, in travel order.
    #[inline]
    pub fn legs(&self) -> &[Segment] {
        &self.legs
    }

    /// Number of reflections recorded so far.
    #[inline]
    pub fn bounces(&self) -> usize {
        self.legs.len()
    }

    /// Number of path elements (legs plus the open tail).
    #[inline]
    pub fn len(&self) -> usize {
        self.legs.len() + 1
    }

    /// Always `false`: a path holds at least its emission ray.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Closes the tail at `hit` and continues along `reflected`.
    pub fn push_bounce(&mut self, reflected: Ray) {
        let hit = reflected.origin;
        self.legs.push(self.tail.truncated_at(hit));
        self.tail = reflected;
    }

    /// Whether every element starts where the previous one ended.
    pub fn is_continuous(&self) -> bool {
        let mut ends = self.legs.iter().map(|l| l.p2);
        let mut starts = self.legs.iter().skip(1).map(|l| l.p1).chain(Some(self.tail.origin));
        ends.all(|end| starts.next().is_some_and(|start| start.approx_eq(&end)))
    }
}

/// One emitted ray and everything that happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedRay {
    emission: Ray,
    original_intensity: f64,
    /// Current intensity; only ever multiplied by factors in `(0, 1]`.
    pub intensity: f64,
    pub path: RayPath,
    /// Set when the bounce timeout stopped the trace.
    pub terminated: bool,
    /// x coordinate where the final path element met the road.
    pub road_hit: Option<f64>,
}

impl TracedRay {
    /// Ray from `origin` at `angle` degrees with Lambertian intensity for a
    /// base tilted `base_tilt` degrees.
    pub fn emit(origin: Point, angle: f64, base_tilt: f64) -> Self {
        Self::with_intensity(
            Ray::from_angle(origin, angle, EMISSION_REACH),
            lambertian(angle, base_tilt),
        )
    }

    /// Ray with an explicit starting intensity.
    pub fn with_intensity(emission: Ray, intensity: f64) -> Self {
        Self {
            emission,
            original_intensity: intensity,
            intensity,
            path: RayPath::new(emission),
            terminated: false,
            road_hit: None,
        }
    }

    #[inline]
    pub fn emission(&self) -> &Ray {
        &self.emission
    }

    #[inline]
    pub fn original_intensity(&self) -> f64 {
        self.original_intensity
    }

    /// Forgets everything a previous trace recorded.
    pub fn reset(&mut self) {
        self.path = RayPath::new(self.emission);
        self.intensity = self.original_intensity;
        self.terminated = false;
        self.road_hit = None;
    }

    /// Whether the final path element climbs.
    pub fn ends_upward(&self) -> bool {
        let tail = self.path.tail();
        tail.through.y > tail.origin.y
    }
}

/// Samples `count` rays from the origin for a base tilted `base_tilt`
/// degrees.
pub fn sample<R: Rng>(
    count: usize,
    distribution: Distribution,
    base_tilt: f64,
    rng: &mut R,
) -> Vec<TracedRay> {
    let step = 180.0 / count.max(1) as f64;
    (0..count)
        .map(|i| {
            let angle = match distribution {
                Distribution::Uniform => 180.0 + i as f64 * step + step / 2.0 + base_tilt,
                Distribution::Random => rng.random_range(180.0..360.0) + base_tilt,
            };
            TracedRay::emit(Point::ORIGIN, angle, base_tilt)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_lambertian_profile() {
        assert!(lambertian(180.0, 0.0).abs() < 1e-12);
        assert!((lambertian(270.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((lambertian(240.0, 60.0) - 0.0).abs() < 1e-12);
        assert!((lambertian(225.0, 0.0) - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_sampling() {
        let mut rng = create_rng(1);
        let rays = sample(4, Distribution::Uniform, 0.0, &mut rng);
        assert_eq!(rays.len(), 4);
        // angles 202.5, 247.5, 292.5, 337.5: symmetric around straight down
        assert!((rays[0].intensity - rays[3].intensity).abs() < 1e-12);
        assert!((rays[1].intensity - rays[2].intensity).abs() < 1e-12);
        assert!(rays.iter().all(|r| r.emission().direction().y < 0.0));
        assert!(rays.iter().all(|r| r.intensity == r.original_intensity()));
    }

    #[test]
    fn test_uniform_sampling_respects_tilt() {
        let mut rng = create_rng(1);
        let flat = sample(6, Distribution::Uniform, 0.0, &mut rng);
        let tilted = sample(6, Distribution::Uniform, 30.0, &mut rng);
        for (a, b) in flat.iter().zip(&tilted) {
            assert!((a.original_intensity() - b.original_intensity()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_random_sampling_stays_below_base() {
        let mut rng = create_rng(7);
        let rays = sample(200, Distribution::Random, 0.0, &mut rng);
        assert!(rays.iter().all(|r| r.emission().direction().y <= 1e-9));
        assert!(rays.iter().all(|r| (0.0..=1.0).contains(&r.intensity)));
    }

    #[test]
    fn test_path_bounce_and_reset() {
        let mut ray = TracedRay::emit(Point::ORIGIN, 270.0, 0.0);
        let hit = Point::new(0.0, -10.0);
        ray.path.push_bounce(Ray::new(hit, Point::new(5.0, -5.0)));
        ray.intensity *= 0.5;
        ray.terminated = true;
        ray.road_hit = Some(3.0);

        assert_eq!(ray.path.bounces(), 1);
        assert_eq!(ray.path.len(), 2);
        assert!(ray.path.is_continuous());
        assert!(ray.ends_upward());

        ray.reset();
        assert_eq!(ray.path.bounces(), 0);
        assert_eq!(ray.intensity, ray.original_intensity());
        assert!(!ray.terminated);
        assert!(ray.road_hit.is_none());
    }

    #[test]
    fn test_parse_distribution() {
        assert_eq!(Distribution::parse("uniform"), Some(Distribution::Uniform));
        assert_eq!(Distribution::parse("random"), Some(Distribution::Random));
        assert_eq!(Distribution::parse("gaussian"), None);
    }
}
