//! Run artifacts: CSV statistics and SVG snapshots.
//!
//! - [`StatsLog`]: one CSV row per generation
//! - [`svg::render`]: a candidate's rays, reflectors and road illumination

mod stats;
pub mod svg;

pub use stats::{StatsLog, HEADER};
