//! Write-only plotting sinks for mesh diagnostics.
//!
//! Everything a mesh wants to show is expressed as a pen program: pick a
//! colour, move the pen, draw lines, drop points. A [`PlotSink`] consumes that
//! program. Nothing read back from a sink ever influences mesh algorithms.

mod stream;
mod svg;

use std::{io, path::Path};

use anyhow::Context;
use patchwork_mesh::Point3;

pub use stream::*;
pub use svg::*;

pub type Rgb = [u8; 3];

pub const RED: Rgb = [255, 0, 0];
pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const CYAN: Rgb = [0, 255, 255];
pub const DARK_GREEN: Rgb = [0, 100, 0];

// Light colours so outlines stay readable against the saturated fill and
// highlight colours above.
const PALETTE: [Rgb; 8] = [
    [255, 204, 153],
    [204, 229, 255],
    [204, 255, 204],
    [255, 204, 229],
    [229, 204, 255],
    [255, 255, 178],
    [178, 255, 255],
    [224, 224, 224],
];

/// A lightened colour that cycles deterministically with `i`.
pub fn palette_color(i: usize) -> Rgb {
    PALETTE[i % PALETTE.len()]
}

pub trait PlotSink {
    fn color(&mut self, rgb: Rgb) -> io::Result<()>;

    /// Lifts the pen and places it at `p`.
    fn move_to(&mut self, p: Point3) -> io::Result<()>;

    /// Draws a line from the pen position to `p`.
    fn line_to(&mut self, p: Point3) -> io::Result<()>;

    /// Marks a single point. The pen ends up at `p`.
    fn point(&mut self, p: Point3) -> io::Result<()>;

    /// Draws the open polyline through `points`.
    fn polyline(&mut self, points: &[Point3]) -> io::Result<()> {
        let mut iter = points.iter();
        if let Some(&first) = iter.next() {
            self.move_to(first)?;
            for &p in iter {
                self.line_to(p)?;
            }
        }
        Ok(())
    }

    fn segment(&mut self, a: Point3, b: Point3) -> io::Result<()> {
        self.move_to(a)?;
        self.line_to(b)
    }
}

/// A single recorded pen operation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlotCommand {
    Color(Rgb),
    Move(Point3),
    Line(Point3),
    Point(Point3),
}

/// Records the pen program in memory.
impl PlotSink for Vec<PlotCommand> {
    fn color(&mut self, rgb: Rgb) -> io::Result<()> {
        self.push(PlotCommand::Color(rgb));
        Ok(())
    }

    fn move_to(&mut self, p: Point3) -> io::Result<()> {
        self.push(PlotCommand::Move(p));
        Ok(())
    }

    fn line_to(&mut self, p: Point3) -> io::Result<()> {
        self.push(PlotCommand::Line(p));
        Ok(())
    }

    fn point(&mut self, p: Point3) -> io::Result<()> {
        self.push(PlotCommand::Point(p));
        Ok(())
    }
}

/// Creates `path` and runs `f` against a binary plot stream writing into it.
pub fn write_plot<P, F>(path: P, f: F) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut PlotStream<io::BufWriter<std::fs::File>>) -> io::Result<()>,
{
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating plot file {}", path.display()))?;
    let mut stream = PlotStream::new(io::BufWriter::new(file));
    f(&mut stream).with_context(|| format!("plotting to {}", path.display()))?;
    stream
        .finish()
        .with_context(|| format!("flushing plot file {}", path.display()))?;
    Ok(())
}

/// Runs `f` against an SVG plot and writes the result to `path`.
pub fn write_svg<P, F>(path: P, f: F) -> anyhow::Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut SvgPlot) -> io::Result<()>,
{
    let path = path.as_ref();
    let mut svg = SvgPlot::new();
    f(&mut svg)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating svg file {}", path.display()))?;
    let mut w = io::BufWriter::new(file);
    svg.write_to(&mut w)
        .with_context(|| format!("writing svg file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_moves_then_draws() {
        let mut rec: Vec<PlotCommand> = Vec::new();
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(1.0, 1.0, 0.0);
        rec.polyline(&[a, b, c]).unwrap();
        assert_eq!(
            vec![
                PlotCommand::Move(a),
                PlotCommand::Line(b),
                PlotCommand::Line(c)
            ],
            rec
        );
    }

    #[test]
    fn empty_polyline_draws_nothing() {
        let mut rec: Vec<PlotCommand> = Vec::new();
        rec.polyline(&[]).unwrap();
        assert!(rec.is_empty());
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), palette_color(PALETTE.len()));
        assert_ne!(palette_color(0), palette_color(1));
    }
}
