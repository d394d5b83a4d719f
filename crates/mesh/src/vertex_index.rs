use std::collections::{BTreeSet, HashMap};

use crate::{surface::SurfacePointId, triangle::VertexId};

/// Maps shared surface points onto dense mesh vertex indices.
///
/// A mesh refers to its vertices by `VertexId` so adjacency maps can key on
/// small integers. The surface layer refers to the same points by
/// `SurfacePointId`. This index holds both directions of that mapping:
///
///    vertex:   0      1      2      3
///    points: [ s7,    s2,    s9,    s4 ]     (VertexId -> SurfacePointId)
///    lookup: { s7:0, s2:1, s9:2, s4:3 }      (SurfacePointId -> VertexId)
///
/// Every surface point appears at most once, so two triangles touching the
/// same surface point share a vertex.
#[derive(Debug, Default, Clone)]
pub struct VertexIndex {
    points: Vec<SurfacePointId>,
    lookup: HashMap<SurfacePointId, VertexId>,
}

impl VertexIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from an arbitrary collection of surface points.
    ///
    /// Duplicates collapse to a single vertex and vertices are numbered in
    /// ascending surface-point order, so the numbering does not depend on the
    /// order points were encountered.
    pub fn from_points<I: IntoIterator<Item = SurfacePointId>>(points: I) -> Self {
        let unique: BTreeSet<SurfacePointId> = points.into_iter().collect();
        let mut index = Self::new();
        for p in unique {
            index.insert(p);
        }
        index
    }

    /// Returns the vertex for `p`, adding it if it is not present yet.
    pub fn insert(&mut self, p: SurfacePointId) -> VertexId {
        if let Some(&v) = self.lookup.get(&p) {
            return v;
        }
        let v = self.points.len() as VertexId;
        self.points.push(p);
        self.lookup.insert(p, v);
        v
    }

    pub fn vertex(&self, p: SurfacePointId) -> Option<VertexId> {
        self.lookup.get(&p).copied()
    }

    pub fn point(&self, v: VertexId) -> Option<SurfacePointId> {
        self.points.get(v as usize).copied()
    }

    pub fn points(&self) -> &[SurfacePointId] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.lookup.clear();
    }
}
