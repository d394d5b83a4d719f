use std::{collections::HashMap, hash::Hash};

use crate::surface::SurfacePointId;

/// The output of a planar triangulation of a surface's parameter domain.
///
/// Each triangle is given as three parameter-domain point keys, and every key
/// can be looked up to find the 3-D surface point it was mapped to.
pub trait Triangulation {
    type Point: Copy + Eq + Hash;

    /// Returns the number of triangles produced by the triangulation.
    fn triangle_count(&self) -> usize;

    /// The triangles, each as three parameter-domain points.
    fn triangles(&self) -> Box<dyn Iterator<Item = [Self::Point; 3]> + '_>;

    /// The surface point that a parameter-domain point maps to.
    fn surface_point(&self, p: &Self::Point) -> Option<SurfacePointId>;
}

/// Key of a parameter-domain point in a [`CdtResult`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParamPointId(pub u32);

/// A constrained Delaunay triangulation result held in memory.
#[derive(Debug, Default, Clone)]
pub struct CdtResult {
    pub triangles: Vec<[ParamPointId; 3]>,
    pub point_map: HashMap<ParamPointId, SurfacePointId>,
}

impl CdtResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// A triangulation whose parameter points map one-to-one onto surface
    /// points with the same number.
    pub fn from_surface_triangles(triangles: &[[u32; 3]]) -> Self {
        let mut cdt = Self::new();
        for t in triangles {
            for &i in t {
                cdt.point_map.insert(ParamPointId(i), SurfacePointId(i));
            }
            cdt.triangles.push(t.map(ParamPointId));
        }
        cdt
    }
}

impl Triangulation for CdtResult {
    type Point = ParamPointId;

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    fn triangles(&self) -> Box<dyn Iterator<Item = [ParamPointId; 3]> + '_> {
        Box::new(self.triangles.iter().copied())
    }

    fn surface_point(&self, p: &ParamPointId) -> Option<SurfacePointId> {
        self.point_map.get(p).copied()
    }
}
