//! Intersection, reflection and angle queries.
//!
//! Rays, segments and lines are all parametrised as `anchor + t * direction`
//! with a type-specific range for `t`, so one routine covers every pairing.

use super::types::{Line, Point, Ray, Segment, DISTANCE_EPSILON};

/// Relative tolerance for the parallel test and parameter ranges.
const PARAM_EPSILON: f64 = 1e-9;

/// A straight geometric object parametrised as `anchor + t * direction`.
pub trait Linear {
    fn anchor(&self) -> Point;
    fn direction(&self) -> Point;
    /// Inclusive range of `t` that belongs to the object.
    fn param_bounds(&self) -> (f64, f64);
}

impl Linear for Segment {
    fn anchor(&self) -> Point {
        self.p1
    }
    fn direction(&self) -> Point {
        Segment::direction(self)
    }
    fn param_bounds(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

impl Linear for Ray {
    fn anchor(&self) -> Point {
        self.origin
    }
    fn direction(&self) -> Point {
        Ray::direction(self)
    }
    fn param_bounds(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }
}

impl Linear for Line {
    fn anchor(&self) -> Point {
        self.point
    }
    fn direction(&self) -> Point {
        self.direction
    }
    fn param_bounds(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

#[inline]
fn in_bounds(t: f64, (lo, hi): (f64, f64)) -> bool {
    t >= lo - PARAM_EPSILON && t <= hi + PARAM_EPSILON
}

/// Single intersection point of two linear objects.
///
/// Returns `None` when they do not meet, when either has zero length, and
/// when they are collinear and share more than one point.
pub fn intersect<A, B>(a: &A, b: &B) -> Option<Point>
where
    A: Linear + ?Sized,
    B: Linear + ?Sized,
{
    let p = a.anchor();
    let r = a.direction();
    let q = b.anchor();
    let s = b.direction();

    let r_len = r.norm();
    let s_len = s.norm();
    if r_len < DISTANCE_EPSILON || s_len < DISTANCE_EPSILON {
        return None;
    }

    let denom = r.cross(&s);
    let qp = q - p;

    if denom.abs() > PARAM_EPSILON * r_len * s_len {
        let t = qp.cross(&s) / denom;
        let u = qp.cross(&r) / denom;
        if in_bounds(t, a.param_bounds()) && in_bounds(u, b.param_bounds()) {
            return Some(p + r * t);
        }
        return None;
    }

    // Parallel: only collinear objects can meet.
    if qp.cross(&r).abs() / r_len > DISTANCE_EPSILON {
        return None;
    }
    collinear_touch(a, b)
}

/// Intersection of two collinear objects, if it is exactly one point.
fn collinear_touch<A, B>(a: &A, b: &B) -> Option<Point>
where
    A: Linear + ?Sized,
    B: Linear + ?Sized,
{
    let p = a.anchor();
    let r = a.direction();
    let rr = r.dot(&r);

    // Express b's parameter range in a's parameter.
    let tq = (b.anchor() - p).dot(&r) / rr;
    let k = b.direction().dot(&r) / rr;
    let (u0, u1) = b.param_bounds();
    let (e0, e1) = (tq + k * u0, tq + k * u1);
    let (b_lo, b_hi) = if e0 <= e1 { (e0, e1) } else { (e1, e0) };

    let (a_lo, a_hi) = a.param_bounds();
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);

    if hi < lo - PARAM_EPSILON || !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    // A single shared point: lengths along `a` must agree within tolerance.
    if (hi - lo) * rr.sqrt() > DISTANCE_EPSILON {
        return None;
    }
    Some(p + r * lo)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(p: &Point, q: &Point) -> f64 {
    p.distance(q)
}

/// Angle in radians, within `[0, π]`, between the directions of `a` and `b`.
///
/// Degenerate (zero-length) inputs yield `0.0`.
pub fn angle_between<A, B>(a: &A, b: &B) -> f64
where
    A: Linear + ?Sized,
    B: Linear + ?Sized,
{
    let u = a.direction();
    let v = b.direction();
    let norms = u.norm() * v.norm();
    if norms < DISTANCE_EPSILON {
        return 0.0;
    }
    (u.dot(&v) / norms).clamp(-1.0, 1.0).acos()
}

/// Specular reflection of `incoming` off `surface`.
///
/// The line through the incoming origin parallel to the surface meets the
/// surface perpendicular at the hit point; mirroring the origin through that
/// meet point gives the second point of the outgoing ray.
///
/// Returns `None` when the ray misses the surface, runs parallel or collinear
/// to it, or starts on the hit point itself.
pub fn reflect(incoming: &Ray, surface: &Segment) -> Option<Ray> {
    let hit = intersect(incoming, surface)?;
    if hit.approx_eq(&incoming.origin) {
        return None;
    }
    let parallel = Line::parallel_through(surface, incoming.origin);
    let perpendicular = Line::perpendicular_through(surface, hit);
    let meet = intersect(&parallel, &perpendicular)?;
    let through = meet + (meet - incoming.origin);
    Some(Ray::new(hit, through))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn assert_ray_eq(actual: Option<Ray>, expected: Ray) {
        let actual = actual.expect("expected a reflection");
        assert!(
            actual.origin.approx_eq(&expected.origin) && actual.through.approx_eq(&expected.through),
            "expected {expected:?}, got {actual:?}"
        );
    }

    // ---- Reflection fixtures ----

    #[test]
    fn test_reflect_diagonal_off_vertical_wall() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 1.0));
        let wall = Segment::new(pt(2.0, 0.0), pt(2.0, 4.0));
        assert_ray_eq(reflect(&ray, &wall), Ray::new(pt(2.0, 2.0), pt(0.0, 4.0)));
    }

    #[test]
    fn test_reflect_head_on_at_wall_end() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let wall = Segment::new(pt(2.0, 0.0), pt(2.0, 4.0));
        assert_ray_eq(reflect(&ray, &wall), Ray::new(pt(2.0, 0.0), pt(0.0, 0.0)));
    }

    #[test]
    fn test_reflect_miss() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let surface = Segment::new(pt(1.0, 1.0), pt(3.0, 3.0));
        assert!(reflect(&ray, &surface).is_none());
    }

    #[test]
    fn test_reflect_parallel_offset() {
        let ray = Ray::new(pt(2.0, 4.0), pt(4.0, 0.0));
        let surface = Segment::new(pt(2.0, 2.0), pt(3.0, 0.0));
        assert!(reflect(&ray, &surface).is_none());
    }

    #[test]
    fn test_reflect_parallel_and_collinear() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let parallel = Segment::new(pt(0.0, 1.0), pt(5.0, 1.0));
        let collinear = Segment::new(pt(2.0, 0.0), pt(5.0, 0.0));
        assert!(reflect(&ray, &parallel).is_none());
        assert!(reflect(&ray, &collinear).is_none());
    }

    #[test]
    fn test_reflect_from_own_surface_is_none() {
        let ray = Ray::new(pt(2.0, 2.0), pt(0.0, 4.0));
        let wall = Segment::new(pt(2.0, 0.0), pt(2.0, 4.0));
        assert!(reflect(&ray, &wall).is_none());
    }

    #[test]
    fn test_reflection_preserves_angle() {
        let ray = Ray::new(pt(-3.0, 5.0), pt(0.0, 0.0));
        let floor = Segment::new(pt(-10.0, 0.0), pt(10.0, 0.0));
        let out = reflect(&ray, &floor).expect("reflects");
        let dir = out.direction();
        assert!(out.origin.approx_eq(&pt(0.0, 0.0)));
        assert!((dir.x / dir.norm() - 3.0 / 34f64.sqrt()).abs() < 1e-9);
        assert!((dir.y / dir.norm() - 5.0 / 34f64.sqrt()).abs() < 1e-9);
    }

    // ---- Intersection ----

    #[test]
    fn test_ray_segment_intersection() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, -1.0));
        let road = Segment::new(pt(0.0, -4000.0), pt(8000.0, -4000.0));
        let hit = intersect(&ray, &road).expect("hits road");
        assert!(hit.approx_eq(&pt(4000.0, -4000.0)));
    }

    #[test]
    fn test_ray_is_truncated_at_origin() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let behind = Segment::new(pt(-2.0, -1.0), pt(-2.0, 1.0));
        assert!(intersect(&ray, &behind).is_none());
    }

    #[test]
    fn test_segment_endpoint_touch() {
        let a = Segment::new(pt(0.0, 0.0), pt(2.0, 0.0));
        let b = Segment::new(pt(2.0, 0.0), pt(2.0, 3.0));
        let hit = intersect(&a, &b).expect("touch at endpoint");
        assert!(hit.approx_eq(&pt(2.0, 0.0)));
    }

    #[test]
    fn test_collinear_single_point_touch() {
        let a = Segment::new(pt(0.0, 0.0), pt(2.0, 0.0));
        let b = Segment::new(pt(2.0, 0.0), pt(5.0, 0.0));
        let hit = intersect(&a, &b).expect("single shared point");
        assert!(hit.approx_eq(&pt(2.0, 0.0)));

        let overlapping = Segment::new(pt(1.0, 0.0), pt(5.0, 0.0));
        assert!(intersect(&a, &overlapping).is_none());
    }

    #[test]
    fn test_zero_length_segment_never_intersects() {
        let ray = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let dot = Segment::new(pt(3.0, 0.0), pt(3.0, 0.0));
        assert!(intersect(&ray, &dot).is_none());
    }

    #[test]
    fn test_line_line_intersection() {
        let a = Line::new(pt(0.0, 0.0), pt(0.0, 1.0));
        let b = Line::new(pt(5.0, 2.0), pt(1.0, 0.0));
        let hit = intersect(&a, &b).expect("lines cross");
        assert!(hit.approx_eq(&pt(0.0, 2.0)));
    }

    // ---- Angles ----

    #[test]
    fn test_angle_between() {
        let road = Segment::new(pt(0.0, -10.0), pt(10.0, -10.0));
        let down = Ray::new(pt(0.0, 0.0), pt(0.0, -1.0));
        let diag = Ray::new(pt(0.0, 0.0), pt(1.0, -1.0));
        let back = Ray::new(pt(0.0, 0.0), pt(-1.0, 0.0));
        assert!((angle_between(&down, &road) - FRAC_PI_2).abs() < 1e-12);
        assert!((angle_between(&diag, &road) - FRAC_PI_4).abs() < 1e-12);
        assert!((angle_between(&back, &road) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        assert!((distance(&pt(0.0, 0.0), &pt(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
