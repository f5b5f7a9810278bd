//! Ray-reflection engine.
//!
//! Traces every ray of a candidate through its reflectors, growing each
//! ray's path in place. Two algorithms exist, one per geometry encoding:
//!
//! - [`trace_two_connected`]: two reflectors hinged on the base corners.
//!   Each ray alternately tries the right and the left reflector until
//!   neither yields a fresh hit. No attenuation, no bounce timeout.
//! - [`trace_multiple_free`]: any number of free reflectors plus the base.
//!   Each bounce goes to the closest reflector other than the one just left,
//!   attenuates the ray by the reflective factor and counts towards the
//!   bounce timeout.
//!
//! Both reset every ray before tracing, so nothing from a previous
//! evaluation survives.

use crate::geom::{intersect, reflect, Point, Ray, Segment};
use crate::light::TracedRay;
use log::debug;

/// Upper bound on right/left rounds per ray in two-connected mode.
///
/// Two-connected tracing has no bounce timeout; this only stops loops caused
/// by numerical ties between the two surfaces.
pub const TWO_CONNECTED_ITERATION_CAP: usize = 1_000;

/// Traces `rays` against a right and a left reflector.
///
/// Returns the total number of reflections across all rays.
pub fn trace_two_connected(rays: &mut [TracedRay], right: &Segment, left: &Segment) -> usize {
    let mut reflections = 0;
    let mut capped = 0usize;

    for ray in rays.iter_mut() {
        ray.reset();
        let mut previous_right: Option<Point> = None;
        let mut previous_left: Option<Point> = None;
        let mut rounds = 0;

        loop {
            let from_right = bounce_fresh(ray, right, &mut previous_right);
            let from_left = bounce_fresh(ray, left, &mut previous_left);
            reflections += from_right as usize + from_left as usize;

            if !from_right && !from_left {
                break;
            }
            rounds += 1;
            if rounds >= TWO_CONNECTED_ITERATION_CAP {
                capped += 1;
                break;
            }
        }
    }

    if capped > 0 {
        debug!("two-connected trace: {capped} ray(s) stopped by the iteration cap");
    }
    reflections
}

/// Reflects the ray's tail off `surface` unless the hit repeats `previous`.
fn bounce_fresh(ray: &mut TracedRay, surface: &Segment, previous: &mut Option<Point>) -> bool {
    let tail = *ray.path.tail();
    let Some(hit) = intersect(&tail, surface) else {
        return false;
    };
    if previous.is_some_and(|p| p.approx_eq(&hit)) {
        return false;
    }
    let Some(reflected) = reflect(&tail, surface) else {
        return false;
    };
    ray.path.push_bounce(reflected);
    *previous = Some(hit);
    true
}

/// Closest reflector hit by `tail`, skipping index `skip`.
///
/// Returns the reflector index and the reflected ray. Among reflectors at
/// the same minimal distance the first one wins.
pub fn closest_reflector(
    tail: &Ray,
    reflectors: &[Segment],
    skip: Option<usize>,
) -> Option<(usize, Ray)> {
    let mut best: Option<(usize, Ray, f64)> = None;
    for (idx, surface) in reflectors.iter().enumerate() {
        if Some(idx) == skip {
            continue;
        }
        let Some(reflected) = reflect(tail, surface) else {
            continue;
        };
        let dist = tail.origin.distance(&reflected.origin);
        match best {
            Some((_, _, closest)) if dist >= closest => {}
            _ => best = Some((idx, reflected, dist)),
        }
    }
    best.map(|(idx, ray, _)| (idx, ray))
}

/// Traces `rays` against free reflectors.
///
/// `reflectors[base_index]` is the base the source sits on; it is excluded
/// from the first bounce. Every reflection multiplies the intensity by
/// `reflective_factor`; a ray that reaches `timeout` reflections is marked
/// terminated.
///
/// Returns the total number of reflections of rays that were not terminated.
pub fn trace_multiple_free(
    rays: &mut [TracedRay],
    reflectors: &[Segment],
    base_index: usize,
    reflective_factor: f64,
    timeout: usize,
) -> usize {
    let mut reflections = 0;

    for ray in rays.iter_mut() {
        ray.reset();
        let mut last = base_index;
        let mut bounces = 0;

        while bounces < timeout {
            let Some((idx, reflected)) = closest_reflector(ray.path.tail(), reflectors, Some(last))
            else {
                break;
            };
            ray.path.push_bounce(reflected);
            ray.intensity *= reflective_factor;
            last = idx;
            bounces += 1;
        }

        if bounces == timeout {
            ray.terminated = true;
        } else {
            reflections += bounces;
        }
    }

    reflections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{sample, Distribution};
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn ray_down_right() -> TracedRay {
        TracedRay::with_intensity(Ray::new(pt(0.0, 0.0), pt(1.0, -1.0)), 1.0)
    }

    // ---- Closest reflector ----

    #[test]
    fn test_closest_reflector_prefers_nearest() {
        let tail = Ray::new(pt(0.0, 0.0), pt(1.0, 0.0));
        let reflectors = [
            Segment::new(pt(5.0, -1.0), pt(5.0, 1.0)),
            Segment::new(pt(2.0, -1.0), pt(2.0, 1.0)),
            Segment::new(pt(9.0, -1.0), pt(9.0, 1.0)),
        ];
        let (idx, out) = closest_reflector(&tail, &reflectors, None).expect("hits");
        assert_eq!(idx, 1);
        assert!(out.origin.approx_eq(&pt(2.0, 0.0)));

        let (idx, _) = closest_reflector(&tail, &reflectors, Some(1)).expect("hits");
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_closest_reflector_none() {
        let tail = Ray::new(pt(0.0, 0.0), pt(-1.0, 0.0));
        let reflectors = [Segment::new(pt(5.0, -1.0), pt(5.0, 1.0))];
        assert!(closest_reflector(&tail, &reflectors, None).is_none());
    }

    // ---- Multiple-free ----

    #[test]
    fn test_free_trace_single_bounce_attenuates() {
        let mut rays = vec![ray_down_right()];
        // A vertical mirror at x = 10 and the base far away.
        let reflectors = [
            Segment::new(pt(10.0, -100.0), pt(10.0, 0.0)),
            Segment::new(pt(-1.0, 5.0), pt(1.0, 5.0)),
        ];
        let n = trace_multiple_free(&mut rays, &reflectors, 1, 0.8, 10);
        assert_eq!(n, 1);
        let ray = &rays[0];
        assert_eq!(ray.path.bounces(), 1);
        assert!((ray.intensity - 0.8).abs() < 1e-12);
        assert!(!ray.terminated);
        assert!(ray.path.tail().origin.approx_eq(&pt(10.0, -10.0)));
        assert!(ray.path.tail().direction().x < 0.0);
    }

    /// A slanted ray between two parallel walls that trap it forever.
    fn trapped() -> (Vec<TracedRay>, [Segment; 3]) {
        let rays = vec![TracedRay::with_intensity(
            Ray::new(pt(0.0, 0.0), pt(1.0, -0.1)),
            1.0,
        )];
        let reflectors = [
            Segment::new(pt(5.0, -1000.0), pt(5.0, 1000.0)),
            Segment::new(pt(-5.0, -1000.0), pt(-5.0, 1000.0)),
            Segment::new(pt(-1.0, 0.0), pt(1.0, 0.0)),
        ];
        (rays, reflectors)
    }

    #[test]
    fn test_free_trace_bounce_cap_terminates() {
        let (mut rays, reflectors) = trapped();
        let timeout = 7;
        let n = trace_multiple_free(&mut rays, &reflectors, 2, 0.5, timeout);
        // trapped rays do not count towards the reflection total
        assert_eq!(n, 0);
        let ray = &rays[0];
        assert!(ray.terminated);
        assert_eq!(ray.path.bounces(), timeout);
        assert!((ray.intensity - 0.5f64.powi(timeout as i32)).abs() < 1e-12);
        assert!(ray.path.is_continuous());
    }

    proptest! {
        #[test]
        fn prop_free_trace_intensity_is_factor_power(
            factor in 1e-6f64..=1.0,
            timeout in 1usize..12,
        ) {
            let (mut rays, reflectors) = trapped();
            trace_multiple_free(&mut rays, &reflectors, 2, factor, timeout);
            let ray = &rays[0];
            prop_assert_eq!(ray.path.bounces(), timeout);
            let expected = factor.powi(timeout as i32);
            prop_assert!((ray.intensity - expected).abs() <= 1e-12 * expected.max(1.0));
        }
    }

    #[test]
    fn test_free_trace_escape_is_not_terminated() {
        let mut rays = vec![ray_down_right()];
        let reflectors = [Segment::new(pt(-1.0, 0.0), pt(1.0, 0.0))];
        let n = trace_multiple_free(&mut rays, &reflectors, 0, 0.9, 3);
        assert_eq!(n, 0);
        assert!(!rays[0].terminated);
        assert_eq!(rays[0].intensity, 1.0);
    }

    #[test]
    fn test_free_trace_retrace_is_identical() {
        let mut rng = create_rng(3);
        let mut rays = sample(40, Distribution::Uniform, 0.0, &mut rng);
        let reflectors = [
            Segment::new(pt(-300.0, -50.0), pt(-100.0, -400.0)),
            Segment::new(pt(300.0, -50.0), pt(100.0, -400.0)),
            Segment::new(pt(-50.0, 0.0), pt(50.0, 0.0)),
        ];
        let first = trace_multiple_free(&mut rays, &reflectors, 2, 0.9, 20);
        let snapshot = rays.clone();
        let second = trace_multiple_free(&mut rays, &reflectors, 2, 0.9, 20);
        assert_eq!(first, second);
        assert_eq!(snapshot, rays);
    }

    // ---- Two-connected ----

    #[test]
    fn test_two_connected_no_attenuation() {
        let mut rays = vec![ray_down_right()];
        let right = Segment::new(pt(10.0, 0.0), pt(10.0, -100.0));
        let left = Segment::new(pt(-10.0, 0.0), pt(-10.0, -100.0));
        let n = trace_two_connected(&mut rays, &right, &left);
        // right at (10,-10), left at (-10,-30), right at (10,-50), left at (-10,-70),
        // right at (10,-90), then it leaves below both.
        assert_eq!(n, 5);
        assert_eq!(rays[0].intensity, 1.0);
        assert!(!rays[0].terminated);
        assert!(rays[0].path.is_continuous());
    }

    #[test]
    fn test_two_connected_miss() {
        let mut rays = vec![ray_down_right()];
        let right = Segment::new(pt(10.0, 0.0), pt(20.0, 5.0));
        let left = Segment::new(pt(-10.0, 0.0), pt(-20.0, 5.0));
        assert_eq!(trace_two_connected(&mut rays, &right, &left), 0);
        assert_eq!(rays[0].path.len(), 1);
    }
}
