use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use patchwork_mesh::Point3;

use crate::{PlotSink, Rgb};

// Every command is a single opcode byte followed by its operands. Coordinates
// are little-endian f64 triples.
pub const OP_COLOR: u8 = b'C';
pub const OP_MOVE: u8 = b'M';
pub const OP_LINE: u8 = b'L';
pub const OP_POINT: u8 = b'P';

/// A binary plot stream.
///
/// The layout of each command is:
///
/// ```text
///   C r:u8 g:u8 b:u8
///   M x:f64 y:f64 z:f64
///   L x:f64 y:f64 z:f64
///   P x:f64 y:f64 z:f64
/// ```
pub struct PlotStream<W: Write> {
    w: W,
}

impl<W: Write> PlotStream<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    fn op_point(&mut self, op: u8, p: Point3) -> io::Result<()> {
        self.w.write_u8(op)?;
        self.w.write_f64::<LittleEndian>(p.x)?;
        self.w.write_f64::<LittleEndian>(p.y)?;
        self.w.write_f64::<LittleEndian>(p.z)
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.w.flush()?;
        Ok(self.w)
    }
}

impl<W: Write> PlotSink for PlotStream<W> {
    fn color(&mut self, rgb: Rgb) -> io::Result<()> {
        self.w.write_u8(OP_COLOR)?;
        self.w.write_all(&rgb)
    }

    fn move_to(&mut self, p: Point3) -> io::Result<()> {
        self.op_point(OP_MOVE, p)
    }

    fn line_to(&mut self, p: Point3) -> io::Result<()> {
        self.op_point(OP_LINE, p)
    }

    fn point(&mut self, p: Point3) -> io::Result<()> {
        self.op_point(OP_POINT, p)
    }
}
