//! Value types of the 2-D geometry kernel.
//!
//! All types are `Copy` and immutable in practice: every transform returns a
//! new value, so a segment shared between the tracer, the renderer and an
//! archived candidate can never be changed behind anyone's back.

use std::ops::{Add, Mul, Sub};

/// Absolute distance below which two points are considered the same.
pub const DISTANCE_EPSILON: f64 = 1e-7;

/// A point (or free vector) in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `degrees` from the positive x axis.
    #[inline]
    pub fn from_angle(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self::new(rad.cos(), rad.sin())
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        (*other - *self).norm()
    }

    /// Length when interpreted as a vector.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3-D cross product.
    #[inline]
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular vector.
    #[inline]
    pub fn perpendicular(&self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Whether the two points lie within [`DISTANCE_EPSILON`] of each other.
    #[inline]
    pub fn approx_eq(&self, other: &Point) -> bool {
        self.distance(other) < DISTANCE_EPSILON
    }

    /// Rotates the point by `degrees` counter-clockwise around `pivot`.
    pub fn rotated_around(&self, pivot: Point, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let rel = *self - pivot;
        pivot + Point::new(cos * rel.x - sin * rel.y, sin * rel.x + cos * rel.y)
    }

    /// Clamps both coordinates into `[-bound, bound]`.
    #[inline]
    pub fn clamped(&self, bound: f64) -> Point {
        Point::new(self.x.clamp(-bound, bound), self.y.clamp(-bound, bound))
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A closed line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    #[inline]
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Segment of `length` centred on the origin, tilted `degrees` from
    /// horizontal. Endpoint coordinates are rounded to whole units.
    pub fn centered(length: f64, degrees: f64) -> Self {
        let half = Point::from_angle(degrees) * (length / 2.0);
        let half = Point::new(half.x.round(), half.y.round());
        Self::new(Point::ORIGIN - half, half)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.p1.distance(&self.p2)
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.p2 - self.p1
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        (self.p1 + self.p2) * 0.5
    }

    /// Whether both endpoints coincide.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p1.approx_eq(&self.p2)
    }

    /// Translated copy.
    pub fn shifted(&self, dx: f64, dy: f64) -> Segment {
        let offset = Point::new(dx, dy);
        Segment::new(self.p1 + offset, self.p2 + offset)
    }

    /// Copy rotated by `degrees` counter-clockwise about the midpoint.
    pub fn rotated(&self, degrees: f64) -> Segment {
        let mid = self.midpoint();
        Segment::new(
            self.p1.rotated_around(mid, degrees),
            self.p2.rotated_around(mid, degrees),
        )
    }

    /// Copy scaled by `coefficient` about the midpoint.
    pub fn resized(&self, coefficient: f64) -> Segment {
        let mid = self.midpoint();
        let half = self.direction() * (coefficient / 2.0);
        Segment::new(mid - half, mid + half)
    }

    /// Copy with every coordinate clamped into `[-bound, bound]`.
    pub fn clamped(&self, bound: f64) -> Segment {
        Segment::new(self.p1.clamped(bound), self.p2.clamped(bound))
    }

    /// Whether every coordinate lies within `[-bound, bound]`.
    pub fn within(&self, bound: f64) -> bool {
        [self.p1.x, self.p1.y, self.p2.x, self.p2.y]
            .iter()
            .all(|c| c.abs() <= bound)
    }
}

/// A half-line starting at `origin` and passing through `through`.
///
/// The far end is unbounded; `through` only fixes the direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub through: Point,
}

impl Ray {
    #[inline]
    pub const fn new(origin: Point, through: Point) -> Self {
        Self { origin, through }
    }

    /// Ray from `origin` at `degrees`, with `through` placed `reach` away.
    pub fn from_angle(origin: Point, degrees: f64, reach: f64) -> Self {
        Self::new(origin, origin + Point::from_angle(degrees) * reach)
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.through - self.origin
    }

    /// The finite piece of this ray between its origin and `end`.
    #[inline]
    pub fn truncated_at(&self, end: Point) -> Segment {
        Segment::new(self.origin, end)
    }
}

/// An unbounded line through `point` with direction `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub point: Point,
    pub direction: Point,
}

impl Line {
    #[inline]
    pub const fn new(point: Point, direction: Point) -> Self {
        Self { point, direction }
    }

    /// Line through `point` parallel to `segment`.
    #[inline]
    pub fn parallel_through(segment: &Segment, point: Point) -> Self {
        Self::new(point, segment.direction())
    }

    /// Line through `point` perpendicular to `segment`.
    #[inline]
    pub fn perpendicular_through(segment: &Segment, point: Point) -> Self {
        Self::new(point, segment.direction().perpendicular())
    }
}
