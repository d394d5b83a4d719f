mod geometry;
mod surface;
mod triangle;
mod triangulation;
mod vertex_index;

pub use geometry::*;
pub use surface::*;
pub use triangle::*;
pub use triangulation::*;
pub use vertex_index::*;
