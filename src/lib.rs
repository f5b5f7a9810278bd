//! Evolutionary design of street-lamp reflector optics.
//!
//! A lamp is a light source sitting on a short base segment, surrounded by
//! mirror segments. Its rays are traced in 2-D through reflections until they
//! leave the lamp, projected onto a road split into equal sections, and the
//! result is scored on efficiency, illuminance uniformity, glare, obtrusive
//! light and light pollution. A genetic algorithm evolves the reflector
//! geometry on one of these criteria or on four of them at once (Pareto mode).
//!
//! - [`geom`]: points, segments, rays, intersection and mirror reflection
//! - [`light`]: ray sampling and per-ray state
//! - [`reflection`]: tracing for both reflector encodings
//! - [`road`]: projection, source replication and sectioning
//! - [`quality`]: metrics and criteria
//! - [`candidate`]: lamp designs and their genetic operators
//! - [`ga`]: the evolutionary loop, selection and NSGA-II ranking
//! - [`config`]: run parameters and the JSON parameter file
//! - [`report`]: CSV statistics and SVG snapshots

pub mod candidate;
pub mod config;
pub mod ga;
pub mod geom;
pub mod light;
pub mod quality;
pub mod random;
pub mod reflection;
pub mod report;
pub mod road;
