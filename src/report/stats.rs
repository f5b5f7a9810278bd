//! Per-generation statistics as CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::ga::GenerationStats;

/// Column names, in write order.
pub const HEADER: &str =
    "generation,evaluated,best,average,efficiency,uniformity,obtrusive_light,light_pollution,glare,geometry";

/// CSV log with one row per generation.
pub struct StatsLog<W: Write> {
    out: W,
}

impl StatsLog<BufWriter<File>> {
    /// Creates (or truncates) the file at `path` and writes the header.
    pub fn create(path: &Path) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> StatsLog<W> {
    /// Wraps `out` and writes the header.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{HEADER}")?;
        Ok(Self { out })
    }

    /// Appends one row.
    pub fn append(&mut self, stats: &GenerationStats) -> io::Result<()> {
        let c = &stats.components;
        writeln!(
            self.out,
            "{},{},{},{},{},{},{},{},{},\"{}\"",
            stats.generation,
            stats.evaluated,
            stats.best,
            stats.average,
            c.efficiency,
            c.uniformity,
            c.obtrusive_light,
            c.light_pollution,
            c.glare_reduction,
            stats.geometry.replace('"', "\"\""),
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
