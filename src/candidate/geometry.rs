//! Reflector encodings.
//!
//! A candidate's reflectors are stored in one of two encodings, wrapped in
//! the tagged [`Geometry`] enum:
//!
//! - [`TwoConnected`]: a horn of two reflectors hinged on the base corners,
//!   each described by an absolute angle and a length coefficient
//! - [`FreeSegments`]: any number of unconstrained segments plus the tilt of
//!   the base the source sits on
//!
//! Both implement [`Encoding`], which rebuilds the reflective segments and
//! applies the encoding's own mutations and crossover.

use rand::Rng;

use crate::config::DesignSpace;
use crate::ga::MutationRates;
use crate::geom::{Point, Ray, Segment};

use super::operators::{self, Axis};

/// Direction components smaller than this are treated as zero when hinging
/// a reflector on a base corner.
const AXIS_EPSILON: f64 = 1e-9;

/// Behaviour shared by both reflector encodings.
pub trait Encoding {
    /// Reflective segments in tracing order for a candidate with `base`.
    fn reflectors(&self, base: &Segment) -> Vec<Segment>;

    /// Applies each mutation with its own probability.
    ///
    /// Returns `true` when at least one mutation fired.
    fn mutate<R: Rng>(&mut self, space: &DesignSpace, rates: &MutationRates, rng: &mut R) -> bool;

    /// Recombines with `other` in place.
    fn crossover<R: Rng>(&mut self, other: &mut Self, rng: &mut R);

    /// One-line description for logs and CSV rows.
    fn summary(&self) -> String;
}

/// Two reflectors hinged on the base corners.
///
/// Angles are absolute degrees; lengths are multiples of the base length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoConnected {
    pub right_angle: f64,
    pub left_angle: f64,
    pub right_length: f64,
    pub left_length: f64,
}

impl TwoConnected {
    /// Random horn within the design space bounds.
    pub fn random<R: Rng>(space: &DesignSpace, rng: &mut R) -> Self {
        let (right_lo, right_hi) = space.right_angle_limits();
        let (left_lo, left_hi) = space.left_angle_limits();
        let (len_lo, len_hi) = (space.horn.length_lower, space.horn.length_upper);
        Self {
            right_angle: rng.random_range(right_lo..=right_hi),
            left_angle: rng.random_range(left_lo..=left_hi),
            right_length: rng.random_range(len_lo..=len_hi),
            left_length: rng.random_range(len_lo..=len_hi),
        }
    }

    /// The `(right, left)` reflectors for `base`.
    ///
    /// Right hangs from `base.p2`, left from `base.p1`.
    pub fn segments(&self, base: &Segment) -> (Segment, Segment) {
        let reach = base.length();
        (
            hinge(base.p2, self.right_angle, self.right_length * reach),
            hinge(base.p1, self.left_angle, self.left_length * reach),
        )
    }
}

/// Reflector from `corner` reaching `reach` units at `angle` degrees.
///
/// Each offset component takes the sign of the matching component of a
/// seed ray from the corner; components along which the seed ray does not
/// move are dropped.
fn hinge(corner: Point, angle: f64, reach: f64) -> Segment {
    let seed = Ray::from_angle(corner, angle, 1.0).direction();
    let flag = |c: f64| if c.abs() < AXIS_EPSILON { 0.0 } else { c.signum() };
    let rad = angle.to_radians();
    let offset = Point::new(
        flag(seed.x) * reach * rad.cos().abs(),
        flag(seed.y) * reach * rad.sin().abs(),
    );
    Segment::new(corner, corner + offset)
}

impl Encoding for TwoConnected {
    fn reflectors(&self, base: &Segment) -> Vec<Segment> {
        let (right, left) = self.segments(base);
        vec![right, left]
    }

    fn mutate<R: Rng>(&mut self, space: &DesignSpace, rates: &MutationRates, rng: &mut R) -> bool {
        let mut changed = false;
        if rng.random_bool(rates.angle) {
            operators::mutate_angle(self, space, rng);
            changed = true;
        }
        if rng.random_bool(rates.length) {
            operators::mutate_length(self, space, rng);
            changed = true;
        }
        changed
    }

    fn crossover<R: Rng>(&mut self, other: &mut Self, _rng: &mut R) {
        operators::crossover_two_connected(self, other);
    }

    fn summary(&self) -> String {
        format!(
            "right {:.2}deg x{:.3} | left {:.2}deg x{:.3}",
            self.right_angle, self.right_length, self.left_angle, self.left_length
        )
    }
}

/// Unconstrained reflectors around a tiltable base.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeSegments {
    pub segments: Vec<Segment>,
    /// Tilt of the base in degrees.
    pub base_tilt: f64,
}

impl FreeSegments {
    /// Random segments: start in `[-distance_limit, distance_limit]²`, end
    /// within `length_limit` of the start on each axis.
    pub fn random<R: Rng>(space: &DesignSpace, rng: &mut R) -> Self {
        let free = &space.free;
        let (d, l) = (free.distance_limit, free.length_limit);
        let segments = (0..free.segment_count)
            .map(|_| {
                let start = Point::new(rng.random_range(-d..=d), rng.random_range(-d..=d));
                let end = start + Point::new(rng.random_range(-l..=l), rng.random_range(-l..=l));
                Segment::new(start, end)
            })
            .collect();
        Self {
            segments,
            base_tilt: space.base_slope.clamp(free.tilt_lower, free.tilt_upper),
        }
    }
}

impl Encoding for FreeSegments {
    /// Free segments followed by the base.
    fn reflectors(&self, base: &Segment) -> Vec<Segment> {
        let mut all = self.segments.clone();
        all.push(*base);
        all
    }

    fn mutate<R: Rng>(&mut self, space: &DesignSpace, rates: &MutationRates, rng: &mut R) -> bool {
        let free = &space.free;
        let mut changed = false;
        if rng.random_bool(rates.shift) {
            let axis = if rng.random_bool(0.5) { Axis::X } else { Axis::Y };
            let distance = jitter(free.shift_step, rng);
            operators::shift_segment(self, axis, distance, space, rng);
            changed = true;
        }
        if rng.random_bool(rates.rotate) {
            let degrees = jitter(free.rotate_step, rng);
            operators::rotate_segment(self, degrees, space, rng);
            changed = true;
        }
        if rng.random_bool(rates.resize) {
            let coefficient = rng.random_range(free.resize_lower..=free.resize_upper);
            operators::resize_segment(self, coefficient, space, rng);
            changed = true;
        }
        if rng.random_bool(rates.tilt) {
            operators::tilt_base(self, space, rng);
            changed = true;
        }
        changed
    }

    fn crossover<R: Rng>(&mut self, other: &mut Self, rng: &mut R) {
        operators::crossover_free_segments(self, other, rng);
    }

    fn summary(&self) -> String {
        let segments: Vec<String> = self
            .segments
            .iter()
            .map(|s| format!("[{:.1} {:.1} -> {:.1} {:.1}]", s.p1.x, s.p1.y, s.p2.x, s.p2.y))
            .collect();
        format!("tilt {:.2}deg | {}", self.base_tilt, segments.join(" "))
    }
}

/// Uniform draw from `[-step, step]`; zero for a zero step.
pub(crate) fn jitter<R: Rng>(step: f64, rng: &mut R) -> f64 {
    if step > 0.0 {
        rng.random_range(-step..=step)
    } else {
        0.0
    }
}

/// A candidate's reflector geometry in one of the two encodings.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    TwoConnected(TwoConnected),
    FreeSegments(FreeSegments),
}

impl Geometry {
    /// Tilt of the base this geometry sits on.
    pub fn base_tilt(&self, space: &DesignSpace) -> f64 {
        match self {
            Geometry::TwoConnected(_) => space.base_slope,
            Geometry::FreeSegments(free) => free.base_tilt,
        }
    }

    pub fn reflectors(&self, base: &Segment) -> Vec<Segment> {
        match self {
            Geometry::TwoConnected(horn) => horn.reflectors(base),
            Geometry::FreeSegments(free) => free.reflectors(base),
        }
    }

    pub fn mutate<R: Rng>(&mut self, space: &DesignSpace, rates: &MutationRates, rng: &mut R) -> bool {
        match self {
            Geometry::TwoConnected(horn) => horn.mutate(space, rates, rng),
            Geometry::FreeSegments(free) => free.mutate(space, rates, rng),
        }
    }

    /// Recombines two geometries of the same encoding.
    ///
    /// Returns `false` and leaves both untouched when the encodings differ.
    pub fn crossover<R: Rng>(&mut self, other: &mut Geometry, rng: &mut R) -> bool {
        match (self, other) {
            (Geometry::TwoConnected(a), Geometry::TwoConnected(b)) => {
                a.crossover(b, rng);
                true
            }
            (Geometry::FreeSegments(a), Geometry::FreeSegments(b)) => {
                a.crossover(b, rng);
                true
            }
            _ => false,
        }
    }

    /// Design identity used to de-duplicate the Pareto archive: the same
    /// angles and lengths, or the same free segment list.
    pub fn same_design(&self, other: &Geometry) -> bool {
        match (self, other) {
            (Geometry::TwoConnected(a), Geometry::TwoConnected(b)) => a == b,
            (Geometry::FreeSegments(a), Geometry::FreeSegments(b)) => a.segments == b.segments,
            _ => false,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Geometry::TwoConnected(horn) => horn.summary(),
            Geometry::FreeSegments(free) => free.summary(),
        }
    }
}
