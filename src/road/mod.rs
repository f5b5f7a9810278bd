//! Road projection and binning.
//!
//! Final ray segments are intersected with the road line, optionally
//! replicated for lamps with several sources, and binned into fixed-width
//! road sections to form the illuminance profile.

use crate::geom::{angle_between, intersect, Point, Segment};
use crate::light::TracedRay;

/// The road below the lamp: a horizontal segment split into sections.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Road {
    pub start: f64,
    pub end: f64,
    /// y coordinate of the road surface; negative (below the lamp).
    pub depth: f64,
    pub sections: usize,
}

impl Road {
    pub fn new(start: f64, end: f64, depth: f64, sections: usize) -> Self {
        Self {
            start,
            end,
            depth,
            sections,
        }
    }

    #[inline]
    pub fn segment(&self) -> Segment {
        Segment::new(
            Point::new(self.start, self.depth),
            Point::new(self.end, self.depth),
        )
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn section_width(&self) -> f64 {
        self.length() / self.sections as f64
    }

    /// Whether `x` lies on the road, ends included.
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.start <= x && x <= self.end
    }
}

/// How additional light sources in one lamp are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLayout {
    /// No explicit arrangement. Extra sources are repeated like [`Shift`](Self::Shift);
    /// with one source hits are used as they are.
    #[default]
    Single,
    /// A second source mirrored about `x = -d / 2`.
    Mirror,
    /// Identical sources repeated every `d` along the road.
    Shift,
}

impl SourceLayout {
    /// Parses the configuration name (`""`, `"none"`, `"mirror"`, `"shift"`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "" | "none" => Some(SourceLayout::Single),
            "mirror" => Some(SourceLayout::Mirror),
            "shift" => Some(SourceLayout::Shift),
            _ => None,
        }
    }
}

/// Number, arrangement and spacing of light sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sources {
    pub count: usize,
    pub layout: SourceLayout,
    pub separating_distance: f64,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            count: 1,
            layout: SourceLayout::Single,
            separating_distance: 0.0,
        }
    }
}

/// One ray meeting the road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadHit {
    pub x: f64,
    pub intensity: f64,
    /// Intensity after the cosine (incidence angle) correction; equal to
    /// `intensity` when the correction is disabled.
    pub corrected: f64,
}

/// Intersects the final element of every live ray with the road.
///
/// Terminated rays are skipped. Each ray's `road_hit` is updated.
pub fn project(rays: &mut [TracedRay], road: &Road, cosine_error: bool) -> Vec<RoadHit> {
    let surface = road.segment();
    let mut hits = Vec::new();

    for ray in rays.iter_mut() {
        ray.road_hit = None;
        if ray.terminated {
            continue;
        }
        let tail = ray.path.tail();
        let Some(point) = intersect(tail, &surface) else {
            continue;
        };
        let corrected = if cosine_error {
            ray.intensity * angle_between(tail, &surface).sin()
        } else {
            ray.intensity
        };
        ray.road_hit = Some(point.x);
        hits.push(RoadHit {
            x: point.x,
            intensity: ray.intensity,
            corrected,
        });
    }
    hits
}

/// Adds the hits produced by the lamp's other sources.
///
/// Replicated hits falling outside the road are dropped.
pub fn replicate(hits: &[RoadHit], sources: &Sources, road: &Road) -> Vec<RoadHit> {
    let d = sources.separating_distance;
    match sources.layout {
        SourceLayout::Mirror => {
            let mut out = Vec::with_capacity(hits.len() * 2);
            for hit in hits {
                out.push(*hit);
                let x = -hit.x - d;
                if road.contains(x) {
                    out.push(RoadHit { x, ..*hit });
                }
            }
            out
        }
        SourceLayout::Single | SourceLayout::Shift => hits
            .iter()
            .flat_map(|hit| {
                (0..sources.count).filter_map(move |k| {
                    let x = hit.x + d * k as f64;
                    road.contains(x).then_some(RoadHit { x, ..*hit })
                })
            })
            .collect(),
    }
}

/// Sums hit intensities per road section.
///
/// Section `i` covers `[start + i·w, start + (i+1)·w)`. The result always
/// has `road.sections` entries.
pub fn bin_into_sections(hits: &[RoadHit], road: &Road) -> Vec<f64> {
    let mut sorted = hits.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let width = road.section_width();
    let mut profile = vec![0.0; road.sections];
    let mut next = 0;

    for (i, value) in profile.iter_mut().enumerate() {
        let left = road.start + i as f64 * width;
        let right = road.start + (i + 1) as f64 * width;
        while next < sorted.len() && sorted[next].x < right {
            if sorted[next].x >= left {
                *value += sorted[next].corrected;
            }
            next += 1;
        }
    }
    profile
}

/// Scales a profile so its maximum is 1; all zeros stay zeros.
pub fn normalize(profile: &[f64]) -> Vec<f64> {
    let max = profile.iter().cloned().fold(0.0f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; profile.len()];
    }
    profile.iter().map(|v| v / max).collect()
}
