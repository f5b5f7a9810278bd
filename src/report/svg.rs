//! SVG snapshots of a candidate.
//!
//! The drawing uses road coordinates with y flipped and a margin around the
//! road: rays in yellow with opacity equal to their remaining intensity, the
//! road as a grey bar shaded red per section by the normalized profile, and
//! the base and reflectors in grey.

use crate::candidate::Candidate;
use crate::config::Environment;
use crate::geom::{Point, Segment};

const MARGIN: f64 = 1000.0;
const RAY_COLOR: &str = "rgb(250,216,22)";
const SECTION_COLOR: &str = "rgb(250,6,22)";
const ROAD_THICKNESS: f64 = 50.0;

/// Maps road coordinates to canvas coordinates.
struct Canvas {
    x_offset: f64,
    y_offset: f64,
    width: f64,
    height: f64,
}

impl Canvas {
    fn new(env: &Environment) -> Self {
        let road = &env.road;
        let x_offset = MARGIN + (-road.start).max(0.0);
        Self {
            x_offset,
            y_offset: MARGIN,
            width: road.end.max(0.0) + x_offset + MARGIN,
            height: road.depth.abs() + 2.0 * MARGIN,
        }
    }

    fn map(&self, p: Point) -> (f64, f64) {
        (p.x + self.x_offset, -p.y + self.y_offset)
    }

    /// Length that crosses the whole canvas.
    fn reach(&self) -> f64 {
        self.width + self.height
    }
}

fn line(out: &mut String, canvas: &Canvas, from: Point, to: Point, style: &str) {
    let (x1, y1) = canvas.map(from);
    let (x2, y2) = canvas.map(to);
    out.push_str(&format!(
        "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" style=\"{style}\"/>\n"
    ));
}

fn reflector(out: &mut String, canvas: &Canvas, segment: &Segment) {
    line(out, canvas, segment.p1, segment.p2, "stroke:gray;stroke-width:20");
}

/// Renders `candidate` as a standalone SVG document.
pub fn render(candidate: &Candidate, env: &Environment) -> String {
    let canvas = Canvas::new(env);
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\">\n\
         <rect width=\"{w:.0}\" height=\"{h:.0}\" fill=\"black\"/>\n",
        w = canvas.width,
        h = canvas.height,
    ));

    for ray in candidate.rays() {
        let style = format!(
            "stroke:{RAY_COLOR};stroke-opacity:{:.3};stroke-width:10",
            ray.intensity.clamp(0.0, 1.0)
        );
        for leg in ray.path.legs() {
            line(&mut out, &canvas, leg.p1, leg.p2, &style);
        }
        if ray.terminated {
            continue;
        }
        let tail = ray.path.tail();
        let end = match ray.road_hit {
            Some(x) => Point::new(x, env.road.depth),
            None => {
                let dir = tail.direction();
                let norm = dir.norm();
                if norm > 0.0 {
                    tail.origin + dir * (canvas.reach() / norm)
                } else {
                    tail.origin
                }
            }
        };
        line(&mut out, &canvas, tail.origin, end, &style);
    }

    let road = &env.road;
    let (road_x, road_y) = canvas.map(Point::new(road.start, road.depth));
    out.push_str(&format!(
        "<rect x=\"{road_x:.2}\" y=\"{road_y:.2}\" width=\"{:.2}\" height=\"{ROAD_THICKNESS}\" fill=\"gray\"/>\n",
        road.length()
    ));
    let width = road.section_width();
    for (i, shade) in candidate.normalized_profile().iter().enumerate() {
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{road_y:.2}\" width=\"{width:.2}\" height=\"{ROAD_THICKNESS}\" \
             style=\"fill:{SECTION_COLOR};fill-opacity:{shade:.3};\"/>\n",
            road_x + i as f64 * width
        ));
    }

    reflector(&mut out, &canvas, candidate.base());
    for segment in candidate.reflectors() {
        reflector(&mut out, &canvas, &segment);
    }

    out.push_str("</svg>\n");
    out
}
