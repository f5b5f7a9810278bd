//! Candidate design space.
//!
//! [`DesignSpace`] says how candidates are built and how far the genetic
//! operators may move them: the light source sampling, the base, and the
//! bounds and step sizes of both reflector encodings.

use crate::light::Distribution;

use super::{ConfigError, EncodingKind};

/// Bounds of the two-connected ("horn") encoding.
///
/// Angles are in degrees relative to the base slope. The right reflector
/// angle lies in `[angle_lower, angle_upper]`, the left one 90° below that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HornBounds {
    pub angle_lower: f64,
    pub angle_upper: f64,
    /// Largest angle change of one mutation.
    pub angle_step: f64,
    /// Reflector length as a multiple of the base length.
    pub length_lower: f64,
    pub length_upper: f64,
    /// Largest length-coefficient change of one mutation.
    pub length_step: f64,
}

impl Default for HornBounds {
    fn default() -> Self {
        Self {
            angle_lower: -90.0,
            angle_upper: 0.0,
            angle_step: 5.0,
            length_lower: 0.5,
            length_upper: 3.0,
            length_step: 0.5,
        }
    }
}

/// Bounds of the multiple-free encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeBounds {
    pub segment_count: usize,
    /// Segment start points are drawn from `[-distance_limit, distance_limit]²`.
    pub distance_limit: f64,
    /// Segment end points lie within `length_limit` of the start on each axis.
    pub length_limit: f64,
    pub shift_step: f64,
    /// Largest rotation (degrees) of one mutation.
    pub rotate_step: f64,
    pub resize_lower: f64,
    pub resize_upper: f64,
    /// Absolute base tilt range, degrees.
    pub tilt_lower: f64,
    pub tilt_upper: f64,
    pub tilt_step: f64,
}

impl Default for FreeBounds {
    fn default() -> Self {
        Self {
            segment_count: 4,
            distance_limit: 300.0,
            length_limit: 300.0,
            shift_step: 50.0,
            rotate_step: 15.0,
            resize_lower: 0.8,
            resize_upper: 1.25,
            tilt_lower: -30.0,
            tilt_upper: 30.0,
            tilt_step: 5.0,
        }
    }
}

impl FreeBounds {
    /// Every free-segment coordinate stays within `[-bound, bound]`.
    #[inline]
    pub fn coordinate_bound(&self) -> f64 {
        self.distance_limit + self.length_limit
    }
}

/// How candidates are created and mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignSpace {
    pub ray_count: usize,
    pub distribution: Distribution,
    pub base_length: f64,
    /// Base slope in degrees; fixed for two-connected candidates, initial
    /// tilt for multiple-free ones.
    pub base_slope: f64,
    pub horn: HornBounds,
    pub free: FreeBounds,
}

impl Default for DesignSpace {
    fn default() -> Self {
        Self {
            ray_count: 100,
            distribution: Distribution::Uniform,
            base_length: 100.0,
            base_slope: 0.0,
            horn: HornBounds::default(),
            free: FreeBounds::default(),
        }
    }
}

impl DesignSpace {
    pub fn with_rays(mut self, count: usize, distribution: Distribution) -> Self {
        self.ray_count = count;
        self.distribution = distribution;
        self
    }

    pub fn with_base(mut self, length: f64, slope: f64) -> Self {
        self.base_length = length;
        self.base_slope = slope;
        self
    }

    pub fn with_horn(mut self, horn: HornBounds) -> Self {
        self.horn = horn;
        self
    }

    pub fn with_free(mut self, free: FreeBounds) -> Self {
        self.free = free;
        self
    }

    /// Absolute `(min, max)` angle of the right reflector.
    pub fn right_angle_limits(&self) -> (f64, f64) {
        (
            self.horn.angle_lower + self.base_slope,
            self.horn.angle_upper + self.base_slope,
        )
    }

    /// Absolute `(min, max)` angle of the left reflector.
    pub fn left_angle_limits(&self) -> (f64, f64) {
        let (lo, hi) = self.right_angle_limits();
        (lo - 90.0, hi - 90.0)
    }

    /// Names of every invalid field for the given encoding.
    pub fn invalid_fields(&self, encoding: EncodingKind) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if self.ray_count == 0 {
            invalid.push("led.rays");
        }
        if !(self.base_length > 0.0 && self.base_length.is_finite()) {
            invalid.push("led.base_length");
        }
        if !self.base_slope.is_finite() {
            invalid.push("led.base_slope");
        }

        match encoding {
            EncodingKind::TwoConnected => {
                let h = &self.horn;
                if !(h.angle_lower <= h.angle_upper) {
                    invalid.push("reflectors.angle_lower_bound");
                }
                if !(h.length_lower >= 0.0 && h.length_lower <= h.length_upper) {
                    invalid.push("reflectors.length_lower_bound");
                }
                if !(h.angle_step >= 0.0) {
                    invalid.push("reflectors.angle_step");
                }
                if !(h.length_step >= 0.0) {
                    invalid.push("reflectors.length_step");
                }
            }
            EncodingKind::MultipleFree => {
                let f = &self.free;
                if f.segment_count == 0 {
                    invalid.push("reflectors.segments");
                }
                if !(f.distance_limit >= 0.0) {
                    invalid.push("reflectors.distance_limit");
                }
                if !(f.length_limit > 0.0) {
                    invalid.push("reflectors.length_limit");
                }
                if !(f.shift_step >= 0.0) {
                    invalid.push("reflectors.shift_step");
                }
                if !(f.rotate_step >= 0.0) {
                    invalid.push("reflectors.rotate_step");
                }
                if !(f.resize_lower > 0.0 && f.resize_lower <= f.resize_upper) {
                    invalid.push("reflectors.resize_lower");
                }
                if !(f.tilt_lower <= f.tilt_upper) {
                    invalid.push("reflectors.tilt_lower");
                }
                if !(f.tilt_step >= 0.0) {
                    invalid.push("reflectors.tilt_step");
                }
            }
        }
        invalid
    }

    /// Validates the design space for the given encoding.
    pub fn validate(&self, encoding: EncodingKind) -> Result<(), ConfigError> {
        ConfigError::from_fields(self.invalid_fields(encoding))
    }
}
