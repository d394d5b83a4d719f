use std::collections::BTreeSet;

use cgmath::InnerSpace;
use log::{debug, warn};
use patchwork_mesh::{Triangle, VertexId, ZERO};

use crate::{
    error::{Result, TopologyError},
    mesh::Mesh,
};

impl<'s> Mesh<'s> {
    /// Vertices at surface points with more than one valid normal.
    pub fn singular_vertices(&self) -> BTreeSet<VertexId> {
        (0..self.vertices.len() as VertexId)
            .filter(|&v| self.is_singular_vertex(v))
            .collect()
    }

    /// Every triangle touching a singular vertex, each listed once.
    pub fn singularity_triangles(&self) -> Vec<Triangle> {
        let unique: BTreeSet<Triangle> = self
            .singular_vertices()
            .into_iter()
            .flat_map(|v| self.vertex_face_neighbors(v))
            .collect();
        unique.into_iter().collect()
    }

    /// Triangles whose winding disagrees with the surface normal.
    ///
    /// A triangle is flagged when both its geometric normal and the surface
    /// normal over it are defined and their dot product falls below the
    /// configured agreement. A flagged triangle with exactly two surface edge
    /// vertices fails the whole query: such a triangle sits on a problem edge
    /// that filtering should have caught.
    pub fn try_interior_incorrect_normals(&mut self, filter: bool) -> Result<Vec<Triangle>> {
        // Brings the problem edges up to date for the repair that follows.
        self.boundary_edges(filter);

        let mut flagged = Vec::new();
        for &t in &self.triangles {
            let tdir = self.triangle_normal(t);
            let bdir = self.surface_normal(t);
            if tdir == ZERO || bdir == ZERO || tdir.dot(bdir) >= self.config.normal_agreement {
                continue;
            }
            let edge_vertices = t.v.iter().filter(|&&v| self.is_edge_vertex(v)).count();
            if edge_vertices == 2 {
                return Err(TopologyError::UnculledProblemTriangle { triangle: t });
            }
            flagged.push(t);
        }
        debug!("{} triangles disagree with the surface normal", flagged.len());
        Ok(flagged)
    }

    /// [`Mesh::try_interior_incorrect_normals`], with failure reported as no
    /// triangles.
    pub fn interior_incorrect_normals(&mut self, filter: bool) -> Vec<Triangle> {
        self.try_interior_incorrect_normals(filter)
            .unwrap_or_else(|e| {
                warn!("normal check aborted: {}", e);
                Vec::new()
            })
    }
}
