//! Adjacency, boundary and defect analysis for tessellations of trimmed
//! surfaces, plus the region growing that isolates a defect for
//! re-triangulation.

mod boundary;
mod config;
mod defects;
mod diagnostics;
pub mod error;
mod mesh;
mod repair;
mod topology;

pub use boundary::BoundaryLoop;
pub use config::*;
pub use error::{Result, TopologyError};
pub use mesh::*;
pub use repair::*;

#[cfg(test)]
mod tests {
    use crate::Mesh;
    use patchwork_test_data::TWO_TRIANGLES;

    #[test]
    fn create_mesh_from_cdt() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::new(&points);
        assert_eq!(2, mesh.build_3d(&TWO_TRIANGLES.cdt()));
    }
}
