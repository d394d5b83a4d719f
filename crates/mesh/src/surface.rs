use std::collections::{HashMap, HashSet};

use crate::geometry::{Point3, Vector3};

/// Identity of a point owned by the surface representation.
///
/// Meshes and metadata refer to surface points by this handle; the positions
/// themselves live in a [`SurfacePoints`] table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfacePointId(pub u32);

/// The table of 3-D surface points shared by every mesh built over a surface.
#[derive(Debug, Default, Clone)]
pub struct SurfacePoints {
    points: Vec<Point3>,
}

impl SurfacePoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: Point3) -> SurfacePointId {
        self.points.push(p);
        SurfacePointId(self.points.len() as u32 - 1)
    }

    pub fn get(&self, id: SurfacePointId) -> Option<Point3> {
        self.points.get(id.0 as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point3> for SurfacePoints {
    fn from_iter<I: IntoIterator<Item = Point3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Read-only knowledge about the surface that a tessellation approximates.
#[derive(Debug, Default, Clone)]
pub struct SurfaceMetadata {
    /// The surface's normals point opposite to the tessellation's winding.
    pub reversed: bool,
    /// Points known to lie on a true boundary (trim curve) of the surface.
    pub edge_points: HashSet<SurfacePointId>,
    /// Points where the surface normal is not single valued.
    pub singular_points: HashSet<SurfacePointId>,
    /// Authoritative surface normal at each point.
    pub normals: HashMap<SurfacePointId, Vector3>,
}

impl SurfaceMetadata {
    pub fn is_edge_point(&self, p: SurfacePointId) -> bool {
        self.edge_points.contains(&p)
    }

    pub fn is_singular(&self, p: SurfacePointId) -> bool {
        self.singular_points.contains(&p)
    }

    /// The normal at `p`, flipped if the surface is reversed.
    pub fn oriented_normal(&self, p: SurfacePointId) -> Option<Vector3> {
        let n = *self.normals.get(&p)?;
        Some(if self.reversed { -n } else { n })
    }
}
