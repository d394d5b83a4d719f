use std::collections::{BTreeMap, BTreeSet};

use cgmath::{EuclideanSpace, InnerSpace};
use log::{debug, warn};
use patchwork_mesh::{
    centroid, facet_normal, unitize, Edge, Point2, Point3, SurfaceMetadata, SurfacePointId,
    SurfacePoints, Triangle, Triangulation, UEdge, Vector3, VertexId, VertexIndex, ZERO,
};

use crate::config::RepairConfig;

/// Which point array of a mesh is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeshMode {
    /// Vertices are shared 3-D surface points.
    ThreeD,
    /// Vertices are planar points owned by the mesh, used for
    /// re-triangulation. The 3-D points stay available for normals.
    TwoD,
}

/// A triangle soup with incrementally maintained adjacency.
///
/// All adjacency maps are derived from the triangle set; they are only ever
/// changed by [`Mesh::add_triangle`] and [`Mesh::remove_triangle`], and are
/// consistent with the triangle set after every call.
///
/// The mesh borrows the surface it tessellates. Surface points are addressed
/// through a [`VertexIndex`], so every map keys on dense `VertexId`s.
pub struct Mesh<'s> {
    pub(crate) mode: MeshMode,
    pub(crate) surface: &'s SurfacePoints,
    pub(crate) metadata: Option<&'s SurfaceMetadata>,
    pub(crate) config: RepairConfig,

    pub(crate) vertices: VertexIndex,
    pub(crate) points_2d: Vec<Point2>,

    pub(crate) triangles: BTreeSet<Triangle>,
    // vertex -> incident triangles
    pub(crate) vertex_triangles: BTreeMap<VertexId, BTreeSet<Triangle>>,
    // vertex -> directed edges leaving it
    pub(crate) vertex_edges: BTreeMap<VertexId, BTreeSet<Edge>>,
    // directed edge -> the triangle winding through it
    pub(crate) edge_triangle: BTreeMap<Edge, Triangle>,
    // undirected edge -> incident triangles; absent means no incidence
    pub(crate) uedge_triangles: BTreeMap<UEdge, BTreeSet<Triangle>>,
    // vertex -> oriented boundary edges touching it at either end
    pub(crate) boundary_vertex_edges: BTreeMap<VertexId, BTreeSet<Edge>>,
    // undirected edges with exactly one incident triangle
    pub(crate) current_boundary: BTreeSet<UEdge>,

    pub(crate) problem_edges: BTreeSet<UEdge>,
    pub(crate) seeds: BTreeSet<Triangle>,
}

impl<'s> Mesh<'s> {
    /// Creates an empty 3-D mesh over `surface` with no vertices.
    pub fn new(surface: &'s SurfacePoints) -> Self {
        Self {
            mode: MeshMode::ThreeD,
            surface,
            metadata: None,
            config: RepairConfig::default(),
            vertices: VertexIndex::new(),
            points_2d: Vec::new(),
            triangles: BTreeSet::new(),
            vertex_triangles: BTreeMap::new(),
            vertex_edges: BTreeMap::new(),
            edge_triangle: BTreeMap::new(),
            uedge_triangles: BTreeMap::new(),
            boundary_vertex_edges: BTreeMap::new(),
            current_boundary: BTreeSet::new(),
            problem_edges: BTreeSet::new(),
            seeds: BTreeSet::new(),
        }
    }

    /// Creates an empty 3-D mesh where vertex `i` is surface point `i`.
    pub fn with_all_points(surface: &'s SurfacePoints) -> Self {
        let mut mesh = Self::new(surface);
        for i in 0..surface.len() {
            mesh.vertices.insert(SurfacePointId(i as u32));
        }
        mesh
    }

    /// Creates an empty planar mesh sharing `vertices` with a parent mesh.
    ///
    /// `points_2d` must be parallel to `vertices`.
    pub(crate) fn planar(
        surface: &'s SurfacePoints,
        metadata: Option<&'s SurfaceMetadata>,
        config: RepairConfig,
        vertices: VertexIndex,
        points_2d: Vec<Point2>,
    ) -> Self {
        let mut mesh = Self::new(surface);
        mesh.mode = MeshMode::TwoD;
        mesh.metadata = metadata;
        mesh.config = config;
        mesh.vertices = vertices;
        mesh.points_2d = points_2d;
        mesh
    }

    pub fn with_config(mut self, config: RepairConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Installs the surface knowledge used for filtering and normals.
    pub fn set_surface_metadata(&mut self, metadata: &'s SurfaceMetadata) {
        self.metadata = Some(metadata);
    }

    pub fn metadata(&self) -> Option<&'s SurfaceMetadata> {
        self.metadata
    }

    pub fn mode(&self) -> MeshMode {
        self.mode
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_index(&self) -> &VertexIndex {
        &self.vertices
    }

    pub fn surface_point(&self, v: VertexId) -> Option<SurfacePointId> {
        self.vertices.point(v)
    }

    pub fn point_3d(&self, v: VertexId) -> Option<Point3> {
        self.surface.get(self.vertices.point(v)?)
    }

    pub fn point_2d(&self, v: VertexId) -> Option<Point2> {
        self.points_2d.get(v as usize).copied()
    }

    pub fn points_2d(&self) -> &[Point2] {
        &self.points_2d
    }

    /// Position of `v` in the active point array. Planar points sit at z = 0.
    pub fn position(&self, v: VertexId) -> Option<Point3> {
        match self.mode {
            MeshMode::ThreeD => self.point_3d(v),
            MeshMode::TwoD => self.point_2d(v).map(|p| Point3::new(p.x, p.y, 0.0)),
        }
    }

    /// Drops every triangle and all adjacency. Points, mode and metadata are
    /// kept.
    pub fn reset(&mut self) {
        self.triangles.clear();
        self.vertex_triangles.clear();
        self.vertex_edges.clear();
        self.edge_triangle.clear();
        self.uedge_triangles.clear();
        self.boundary_vertex_edges.clear();
        self.current_boundary.clear();
        self.problem_edges.clear();
    }

    /// Full reset: [`Mesh::reset`] plus both point arrays, returning the mesh
    /// to an empty 3-D mesh. Vertex indices are not stable across this call.
    pub fn clear(&mut self) {
        self.reset();
        self.vertices.clear();
        self.points_2d = Vec::new();
        self.seeds.clear();
        self.mode = MeshMode::ThreeD;
    }

    /// Replaces the mesh contents with the triangles of `cdt`.
    ///
    /// Parameter points that map to the same surface point become one vertex.
    /// Triangles with an unmapped point, or whose three surface points are not
    /// pairwise distinct, are skipped. Returns the number of triangles stored.
    pub fn build_3d<T: Triangulation>(&mut self, cdt: &T) -> usize {
        self.clear();

        self.vertices = VertexIndex::from_points(
            cdt.triangles()
                .flat_map(|t| t.into_iter())
                .filter_map(|p| cdt.surface_point(&p)),
        );

        let mut skipped = 0;
        for t in cdt.triangles() {
            let [Some(a), Some(b), Some(c)] = t.map(|p| cdt.surface_point(&p)) else {
                skipped += 1;
                continue;
            };
            if a == b || b == c || c == a {
                skipped += 1;
                continue;
            }
            let (Some(va), Some(vb), Some(vc)) = (
                self.vertices.vertex(a),
                self.vertices.vertex(b),
                self.vertices.vertex(c),
            ) else {
                skipped += 1;
                continue;
            };
            self.add_triangle(Triangle::new(va, vb, vc), false);
        }
        if skipped > 0 {
            warn!(
                "skipped {} of {} triangulation triangles",
                skipped,
                cdt.triangle_count()
            );
        }
        debug!(
            "built mesh with {} vertices and {} triangles",
            self.vertices.len(),
            self.triangles.len()
        );
        self.triangles.len()
    }

    /// Unit normal of `t` from its 3-D positions, zero if degenerate.
    pub fn triangle_normal(&self, t: Triangle) -> Vector3 {
        match self.corners(t) {
            Some([a, b, c]) => facet_normal(a, b, c),
            None => ZERO,
        }
    }

    /// Centroid of `t`'s 3-D positions.
    pub fn triangle_center(&self, t: Triangle) -> Point3 {
        match self.corners(t) {
            Some([a, b, c]) => centroid(a, b, c),
            None => Point3::origin(),
        }
    }

    /// The surface's authoritative normal over `t`.
    ///
    /// Averaged over the vertices that are not singular and have a normal,
    /// flipped for reversed surfaces. Zero without metadata or without any
    /// usable vertex.
    pub fn surface_normal(&self, t: Triangle) -> Vector3 {
        let Some(meta) = self.metadata else {
            return ZERO;
        };
        let mut sum = ZERO;
        let mut count = 0;
        for v in t.v {
            let Some(p) = self.vertices.point(v) else {
                continue;
            };
            // Normals at singular points blend several faces.
            if meta.is_singular(p) {
                continue;
            }
            if let Some(n) = meta.oriented_normal(p) {
                sum += n;
                count += 1;
            }
        }
        if count == 0 {
            return ZERO;
        }
        unitize(sum / count as f64)
    }

    /// Surface normal of `t`, or its geometric normal when the surface has
    /// nothing to say about it.
    pub(crate) fn guide_normal(&self, t: Triangle) -> Vector3 {
        let n = self.surface_normal(t);
        if n.magnitude2() > 0.0 {
            n
        } else {
            self.triangle_normal(t)
        }
    }

    pub(crate) fn corners(&self, t: Triangle) -> Option<[Point3; 3]> {
        Some([
            self.point_3d(t.v[0])?,
            self.point_3d(t.v[1])?,
            self.point_3d(t.v[2])?,
        ])
    }

    pub(crate) fn is_edge_vertex(&self, v: VertexId) -> bool {
        match (self.metadata, self.vertices.point(v)) {
            (Some(meta), Some(p)) => meta.is_edge_point(p),
            _ => false,
        }
    }

    pub(crate) fn is_singular_vertex(&self, v: VertexId) -> bool {
        match (self.metadata, self.vertices.point(v)) {
            (Some(meta), Some(p)) => meta.is_singular(p),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;
    use patchwork_mesh::{CdtResult, ParamPointId};
    use patchwork_test_data::{OPEN_PYRAMID, TWO_TRIANGLES};

    #[test]
    fn build_dedups_surface_points() {
        let points = TWO_TRIANGLES.surface_points();
        let mut cdt = CdtResult::new();
        // Parameter points 10 and 0 are the same surface point.
        cdt.triangles.push([ParamPointId(0), ParamPointId(1), ParamPointId(2)]);
        cdt.triangles.push([ParamPointId(10), ParamPointId(2), ParamPointId(3)]);
        for i in 0..4 {
            cdt.point_map.insert(ParamPointId(i), SurfacePointId(i));
        }
        cdt.point_map.insert(ParamPointId(10), SurfacePointId(0));

        let mut mesh = Mesh::new(&points);
        assert_eq!(2, mesh.build_3d(&cdt));
        assert_eq!(4, mesh.vertex_count());
        assert_eq!(2, mesh.vertex_face_neighbors(0).len());
    }

    #[test]
    fn build_skips_collapsed_triangles() {
        let points = TWO_TRIANGLES.surface_points();
        let mut cdt = CdtResult::from_surface_triangles(TWO_TRIANGLES.triangles);
        // Distinct parameter points, same surface point: a collapsed triangle.
        cdt.triangles.push([ParamPointId(0), ParamPointId(1), ParamPointId(20)]);
        cdt.point_map.insert(ParamPointId(20), SurfacePointId(1));
        // An unmapped parameter point.
        cdt.triangles.push([ParamPointId(0), ParamPointId(1), ParamPointId(30)]);

        let mut mesh = Mesh::new(&points);
        assert_eq!(2, mesh.build_3d(&cdt));
    }

    #[test]
    fn rebuild_replaces_contents() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());
        assert_eq!(4, mesh.triangle_count());
        mesh.build_3d(&CdtResult::from_surface_triangles(&[[0, 1, 2]]));
        assert_eq!(1, mesh.triangle_count());
        assert_eq!(3, mesh.vertex_count());
    }

    #[test]
    fn surface_normal_without_metadata_is_zero() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        let t = Triangle::new(0, 1, 2);
        assert_eq!(ZERO, mesh.surface_normal(t));
        assert_eq!(Vector3::new(0.0, 0.0, 1.0), mesh.triangle_normal(t));
        assert_eq!(mesh.triangle_normal(t), mesh.guide_normal(t));
    }

    #[test]
    fn surface_normal_skips_singular_points() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        meta.normals.insert(SurfacePointId(0), Vector3::new(1.0, 0.0, 0.0));
        meta.normals.insert(SurfacePointId(1), Vector3::new(0.0, 0.0, 1.0));
        meta.normals.insert(SurfacePointId(2), Vector3::new(0.0, 0.0, 1.0));
        meta.singular_points.insert(SurfacePointId(0));

        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        assert_eq!(
            Vector3::new(0.0, 0.0, 1.0),
            mesh.surface_normal(Triangle::new(0, 1, 2))
        );
    }

    #[test]
    fn surface_normal_follows_reversal() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        for i in 0..4 {
            meta.normals.insert(SurfacePointId(i), Vector3::new(0.0, 0.0, 1.0));
        }
        meta.reversed = true;
        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        assert_eq!(
            Vector3::new(0.0, 0.0, -1.0),
            mesh.surface_normal(Triangle::new(0, 1, 2))
        );
    }

    #[test]
    fn triangle_center_is_centroid() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());
        let c = mesh.triangle_center(Triangle::new(4, 0, 1));
        assert_float_eq!(c.x, 0.5, abs <= 1e-12);
        assert_float_eq!(c.y, 1.0 / 6.0, abs <= 1e-12);
        assert_float_eq!(c.z, 1.0 / 3.0, abs <= 1e-12);
    }
}
