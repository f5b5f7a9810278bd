//! Genetic operators for reflector encodings.
//!
//! Every operator works in place on one encoding and leaves the result
//! inside the design space bounds:
//!
//! # Mutation Operators
//!
//! - [`mutate_angle`], [`mutate_length`]: jitter a horn's angles or length
//!   coefficients
//! - [`shift_segment`], [`rotate_segment`], [`resize_segment`]: move one
//!   randomly chosen free segment, clamped to the coordinate bound
//! - [`tilt_base`]: jitter the base tilt of a free-segment encoding
//!
//! # Crossover Operators
//!
//! - [`crossover_two_connected`]: swap the right reflectors
//! - [`crossover_free_segments`]: one-point crossover of the segment lists

use rand::Rng;

use crate::config::DesignSpace;

use super::geometry::{jitter, FreeSegments, TwoConnected};

/// Coordinate axis for [`shift_segment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

// ============================================================================
// Two-connected
// ============================================================================

/// Jitters both angles by up to `angle_step` degrees.
///
/// The right angle stays in the design space's right limits, the left one in
/// the left limits (90° lower).
pub fn mutate_angle<R: Rng>(horn: &mut TwoConnected, space: &DesignSpace, rng: &mut R) {
    let step = space.horn.angle_step;
    let (lo, hi) = space.right_angle_limits();
    horn.right_angle = (horn.right_angle + jitter(step, rng)).clamp(lo, hi);
    let (lo, hi) = space.left_angle_limits();
    horn.left_angle = (horn.left_angle + jitter(step, rng)).clamp(lo, hi);
}

/// Jitters both length coefficients by up to `length_step`.
pub fn mutate_length<R: Rng>(horn: &mut TwoConnected, space: &DesignSpace, rng: &mut R) {
    let bounds = &space.horn;
    let (lo, hi) = (bounds.length_lower, bounds.length_upper);
    horn.right_length = (horn.right_length + jitter(bounds.length_step, rng)).clamp(lo, hi);
    horn.left_length = (horn.left_length + jitter(bounds.length_step, rng)).clamp(lo, hi);
}

/// Swaps the right `(angle, length)` pair between two horns.
pub fn crossover_two_connected(a: &mut TwoConnected, b: &mut TwoConnected) {
    std::mem::swap(&mut a.right_angle, &mut b.right_angle);
    std::mem::swap(&mut a.right_length, &mut b.right_length);
}

// ============================================================================
// Free segments
// ============================================================================

/// Picks the segment to move, `None` for an empty list.
fn pick<R: Rng>(free: &FreeSegments, rng: &mut R) -> Option<usize> {
    (!free.segments.is_empty()).then(|| rng.random_range(0..free.segments.len()))
}

/// Moves one random segment `distance` units along `axis`.
pub fn shift_segment<R: Rng>(
    free: &mut FreeSegments,
    axis: Axis,
    distance: f64,
    space: &DesignSpace,
    rng: &mut R,
) {
    let Some(idx) = pick(free, rng) else {
        return;
    };
    let (dx, dy) = match axis {
        Axis::X => (distance, 0.0),
        Axis::Y => (0.0, distance),
    };
    let bound = space.free.coordinate_bound();
    free.segments[idx] = free.segments[idx].shifted(dx, dy).clamped(bound);
}

/// Rotates one random segment by `degrees` about its midpoint.
pub fn rotate_segment<R: Rng>(free: &mut FreeSegments, degrees: f64, space: &DesignSpace, rng: &mut R) {
    let Some(idx) = pick(free, rng) else {
        return;
    };
    let bound = space.free.coordinate_bound();
    free.segments[idx] = free.segments[idx].rotated(degrees).clamped(bound);
}

/// Scales one random segment by `coefficient` about its midpoint.
pub fn resize_segment<R: Rng>(
    free: &mut FreeSegments,
    coefficient: f64,
    space: &DesignSpace,
    rng: &mut R,
) {
    let Some(idx) = pick(free, rng) else {
        return;
    };
    let bound = space.free.coordinate_bound();
    free.segments[idx] = free.segments[idx].resized(coefficient).clamped(bound);
}

/// Jitters the base tilt by up to `tilt_step` degrees within the tilt range.
///
/// The owning candidate rebuilds its base and resamples its rays.
pub fn tilt_base<R: Rng>(free: &mut FreeSegments, space: &DesignSpace, rng: &mut R) {
    let bounds = &space.free;
    free.base_tilt =
        (free.base_tilt + jitter(bounds.tilt_step, rng)).clamp(bounds.tilt_lower, bounds.tilt_upper);
}

/// One-point crossover: lists are cut at a random index and their tails
/// exchanged.
pub fn crossover_free_segments<R: Rng>(a: &mut FreeSegments, b: &mut FreeSegments, rng: &mut R) {
    let n = a.segments.len().min(b.segments.len());
    if n == 0 {
        return;
    }
    let split = rng.random_range(0..n);
    let tail_a = a.segments.split_off(split);
    let tail_b = b.segments.split_off(split);
    a.segments.extend(tail_b);
    b.segments.extend(tail_a);
}
