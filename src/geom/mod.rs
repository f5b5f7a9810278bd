//! 2-D geometry kernel.
//!
//! Points, segments, rays and lines as immutable value types, plus the exact
//! queries the reflection engine needs: intersection, specular reflection,
//! distance and angle.
//!
//! Degenerate configurations (parallel or collinear objects, zero-length
//! segments) are reported as `None`, never as errors.

mod intersect;
mod types;

pub use intersect::{angle_between, distance, intersect, reflect, Linear};
pub use types::{Line, Point, Ray, Segment, DISTANCE_EPSILON};
