use std::io::{self, Write};

use patchwork_mesh::Point3;

use crate::{PlotSink, Rgb};

enum Mark {
    Line { from: Point3, to: Point3, rgb: Rgb },
    Dot { at: Point3, rgb: Rgb },
}

/// Collects a pen program and renders its x/y projection as an SVG image.
///
/// Nothing is written until [`SvgPlot::write_to`] since the view box depends
/// on the extent of everything drawn.
pub struct SvgPlot {
    marks: Vec<Mark>,
    pen: Option<Point3>,
    rgb: Rgb,
}

impl SvgPlot {
    pub fn new() -> Self {
        Self {
            marks: Vec::new(),
            pen: None,
            rgb: [0, 0, 0],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    fn limits(&self) -> ((f64, f64), (f64, f64)) {
        let mut x_limits = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y_limits = (f64::INFINITY, f64::NEG_INFINITY);
        let mut track = |p: &Point3| {
            x_limits.0 = x_limits.0.min(p.x);
            x_limits.1 = x_limits.1.max(p.x);
            y_limits.0 = y_limits.0.min(p.y);
            y_limits.1 = y_limits.1.max(p.y);
        };
        for m in &self.marks {
            match m {
                Mark::Line { from, to, .. } => {
                    track(from);
                    track(to);
                }
                Mark::Dot { at, .. } => track(at),
            }
        }
        if x_limits.0 > x_limits.1 {
            return ((0.0, 1.0), (0.0, 1.0));
        }
        (x_limits, y_limits)
    }

    pub fn write_to<W: Write>(&self, f: &mut W) -> io::Result<()> {
        let (x_limits, y_limits) = self.limits();
        let extent = (x_limits.1 - x_limits.0).max(y_limits.1 - y_limits.0);
        let extent = if extent > 0.0 { extent } else { 1.0 };
        let margin = extent * 0.05;
        let stroke = extent * 0.004;

        // SVG's y axis points down; draw at -y so the image is not mirrored.
        writeln!(
            f,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{} {} {} {}\">",
            x_limits.0 - margin,
            -y_limits.1 - margin,
            (x_limits.1 - x_limits.0) + 2.0 * margin,
            (y_limits.1 - y_limits.0) + 2.0 * margin
        )?;
        writeln!(f, "  <rect x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\" fill=\"white\"/>")?;
        for m in &self.marks {
            match m {
                Mark::Line { from, to, rgb } => writeln!(
                    f,
                    "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    from.x,
                    -from.y,
                    to.x,
                    -to.y,
                    hex(*rgb),
                    stroke
                )?,
                Mark::Dot { at, rgb } => writeln!(
                    f,
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                    at.x,
                    -at.y,
                    stroke * 2.0,
                    hex(*rgb)
                )?,
            }
        }
        writeln!(f, "</svg>")?;
        f.flush()
    }
}

impl Default for SvgPlot {
    fn default() -> Self {
        Self::new()
    }
}

fn hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

impl PlotSink for SvgPlot {
    fn color(&mut self, rgb: Rgb) -> io::Result<()> {
        self.rgb = rgb;
        Ok(())
    }

    fn move_to(&mut self, p: Point3) -> io::Result<()> {
        self.pen = Some(p);
        Ok(())
    }

    fn line_to(&mut self, p: Point3) -> io::Result<()> {
        // A line with the pen up only places the pen.
        if let Some(from) = self.pen {
            self.marks.push(Mark::Line {
                from,
                to: p,
                rgb: self.rgb,
            });
        }
        self.pen = Some(p);
        Ok(())
    }

    fn point(&mut self, p: Point3) -> io::Result<()> {
        self.marks.push(Mark::Dot {
            at: p,
            rgb: self.rgb,
        });
        self.pen = Some(p);
        Ok(())
    }
}
