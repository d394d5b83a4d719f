use std::collections::BTreeSet;

use log::{debug, warn};
use ordered_float::OrderedFloat;
use patchwork_mesh::{Edge, Triangle, UEdge, VertexId};

use crate::{
    error::{Result, TopologyError},
    mesh::{Mesh, MeshMode},
};

/// A closed walk along the boundary. The first vertex is repeated at the end.
pub type BoundaryLoop = Vec<VertexId>;

impl<'s> Mesh<'s> {
    /// Splits the current boundary into edges that are kept and problem edges.
    ///
    /// Only a 3-D mesh with metadata installed can be filtered; otherwise
    /// every boundary edge is kept.
    fn classify_boundary(&self, filter: bool) -> (BTreeSet<UEdge>, BTreeSet<UEdge>) {
        let metadata = match self.mode {
            MeshMode::ThreeD if filter => self.metadata,
            _ => None,
        };
        let Some(meta) = metadata else {
            return (self.current_boundary.clone(), BTreeSet::new());
        };

        // An open edge between points the surface does not know as edge points
        // is a hole in the tessellation, not a real boundary.
        self.current_boundary.iter().partition(|e| {
            e.endpoints().iter().all(|&v| {
                self.vertices
                    .point(v)
                    .map_or(false, |p| meta.is_edge_point(p))
            })
        })
    }

    /// Undirected edges with exactly one incident triangle.
    ///
    /// With `filter`, edges with an endpoint that is not a surface edge point
    /// are left out and recorded as problem edges instead. The problem edge
    /// set is recomputed on every call.
    pub fn boundary_edges(&mut self, filter: bool) -> BTreeSet<UEdge> {
        let (edges, problems) = self.classify_boundary(filter);
        if !problems.is_empty() {
            debug!("{} problem edges on the boundary", problems.len());
        }
        self.problem_edges = problems;
        edges
    }

    /// Problem edges found by the most recent filtered boundary query.
    pub fn problem_edges(&self) -> &BTreeSet<UEdge> {
        &self.problem_edges
    }

    /// True if any edge of `t` is a recorded problem edge.
    pub fn tri_problem_edges(&self, t: Triangle) -> bool {
        !self.problem_edges.is_empty()
            && t.uedges().iter().any(|e| self.problem_edges.contains(e))
    }

    /// The direction in which the single triangle incident to boundary edge
    /// `e` traverses it. `None` if `e` is not a boundary edge.
    pub fn find_boundary_oriented_edge(&self, e: UEdge) -> Option<Edge> {
        let faces = self.uedge_triangles.get(&e)?;
        if faces.len() != 1 {
            return None;
        }
        let t = faces.iter().next()?;
        t.edges().into_iter().find(|d| UEdge::from(*d) == e)
    }

    /// Walks the boundary into closed loops oriented like their triangles.
    ///
    /// Each loop lists its start vertex again at the end. A walk that reaches
    /// a vertex with no way forward, or with more than one, fails the whole
    /// query.
    pub fn try_boundary_loops(&mut self, filter: bool) -> Result<Vec<BoundaryLoop>> {
        let edges = self.boundary_edges(filter);
        if edges.is_empty() {
            debug!("no boundary edges in mesh");
            return Ok(Vec::new());
        }

        let mut unadded = edges.clone();
        let mut loops = Vec::new();
        while let Some(first) = unadded.pop_first() {
            let start = self
                .find_boundary_oriented_edge(first)
                .ok_or(TopologyError::MissingOrientedEdge { edge: first })?;

            let mut prev = start.from;
            let mut curr = start.to;
            let mut walk = vec![start.from, start.to];
            while curr != start.from {
                let traversed = UEdge::new(prev, curr);
                let candidates: Vec<Edge> = self
                    .vertex_edges(curr)
                    .filter(|&d| {
                        let ue = UEdge::from(d);
                        ue != traversed && edges.contains(&ue) && unadded.contains(&ue)
                    })
                    .collect();

                let next = match candidates.as_slice() {
                    [next] => *next,
                    [] if unadded.is_empty() => {
                        return Err(TopologyError::UnclosedLoop {
                            start: start.from,
                            end: curr,
                        })
                    }
                    _ => {
                        return Err(TopologyError::NonManifoldBoundary {
                            vertex: curr,
                            candidates: candidates.len(),
                        })
                    }
                };
                unadded.remove(&UEdge::from(next));
                prev = next.from;
                curr = next.to;
                walk.push(curr);
            }
            loops.push(walk);
        }

        debug!(
            "found {} boundary loops, sizes: {:?}",
            loops.len(),
            loops.iter().map(|l| l.len() - 1).collect::<Vec<_>>()
        );
        Ok(loops)
    }

    /// [`Mesh::try_boundary_loops`], with failure reported as no loops.
    pub fn boundary_loops(&mut self, filter: bool) -> Vec<BoundaryLoop> {
        self.try_boundary_loops(filter).unwrap_or_else(|e| {
            warn!("no usable boundary: {}", e);
            Vec::new()
        })
    }

    /// Index of the loop most likely to be the outer one: the loop with the
    /// largest bounding box diagonal in the active point array. Ties go to the
    /// earlier loop.
    pub fn outer_loop(&self, loops: &[BoundaryLoop]) -> Option<usize> {
        loops
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|(_, l)| OrderedFloat(self.loop_extent(l)))
            .map(|(i, _)| i)
    }

    fn loop_extent(&self, l: &[VertexId]) -> f64 {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for p in l.iter().filter_map(|&v| self.position(v)) {
            for (axis, c) in [p.x, p.y, p.z].into_iter().enumerate() {
                lo[axis] = lo[axis].min(c);
                hi[axis] = hi[axis].max(c);
            }
        }
        if lo[0] > hi[0] {
            return 0.0;
        }
        (0..3)
            .map(|axis| (hi[axis] - lo[axis]).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    /// Vertices of stored triangles that are not an endpoint of any boundary
    /// edge.
    pub fn interior_points(&mut self, filter: bool) -> BTreeSet<VertexId> {
        let on_boundary: BTreeSet<VertexId> = self
            .boundary_edges(filter)
            .iter()
            .flat_map(|e| e.endpoints())
            .collect();
        self.triangles
            .iter()
            .flat_map(|t| t.v)
            .filter(|v| !on_boundary.contains(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchwork_mesh::{SurfaceMetadata, SurfacePointId};
    use patchwork_test_data::{grid, FAN, OPEN_PYRAMID, TWO_TRIANGLES};

    #[test]
    fn two_triangles_boundary() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        let edges = mesh.boundary_edges(false);
        assert_eq!(
            [
                UEdge::new(0, 1),
                UEdge::new(0, 3),
                UEdge::new(1, 2),
                UEdge::new(2, 3)
            ]
            .into_iter()
            .collect::<BTreeSet<_>>(),
            edges
        );
    }

    #[test]
    fn oriented_edge_follows_triangle() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&TWO_TRIANGLES.cdt());
        assert_eq!(
            Some(Edge::new(3, 0)),
            mesh.find_boundary_oriented_edge(UEdge::new(0, 3))
        );
        assert_eq!(None, mesh.find_boundary_oriented_edge(UEdge::new(0, 2)));
        assert_eq!(None, mesh.find_boundary_oriented_edge(UEdge::new(1, 3)));
    }

    #[test]
    fn pyramid_loop_walks_the_base() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());
        let loops = mesh.boundary_loops(false);
        assert_eq!(vec![vec![0, 1, 2, 3, 0]], loops);
    }

    #[test]
    fn fan_hub_is_on_the_boundary() {
        let points = FAN.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&FAN.cdt());
        assert!(mesh.interior_points(false).is_empty());
        assert_eq!(vec![vec![0, 1, 2, 3, 4, 5, 0]], mesh.boundary_loops(false));
    }

    #[test]
    fn closed_surface_has_no_loops() {
        let points = OPEN_PYRAMID.surface_points();
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&OPEN_PYRAMID.cdt());
        mesh.add_triangle(Triangle::new(0, 3, 2), false);
        mesh.add_triangle(Triangle::new(0, 2, 1), false);
        assert!(mesh.boundary_edges(false).is_empty());
        assert_eq!(Ok(vec![]), mesh.try_boundary_loops(false));
    }

    #[test]
    fn bow_tie_fails_the_walk() {
        let points = TWO_TRIANGLES.surface_points();
        let mut mesh = Mesh::with_all_points(&points);
        // Two triangles touching at vertex 2 only.
        mesh.add_triangle(Triangle::new(0, 1, 2), false);
        mesh.add_triangle(Triangle::new(2, 3, 4), false);
        assert_eq!(
            Err(TopologyError::NonManifoldBoundary {
                vertex: 2,
                candidates: 2
            }),
            mesh.try_boundary_loops(false)
        );
        assert!(mesh.boundary_loops(false).is_empty());
    }

    #[test]
    fn grid_with_hole_has_two_loops() {
        let (points, cdt) = grid(3, 3);
        let mut mesh = Mesh::new(&points);
        mesh.build_3d(&cdt);
        // Remove the centre cell, points 5, 6, 9, 10.
        mesh.remove_triangle(Triangle::new(5, 6, 10));
        mesh.remove_triangle(Triangle::new(5, 10, 9));

        let loops = mesh.boundary_loops(false);
        assert_eq!(2, loops.len());
        let outer = mesh.outer_loop(&loops).unwrap();
        assert_eq!(13, loops[outer].len());
        assert_eq!(5, loops[1 - outer].len());
        // The hole runs against the outer loop.
        assert_eq!(vec![6, 5, 9, 10, 6], loops[1 - outer]);
    }

    #[test]
    fn outer_loop_ties_go_to_first() {
        let points = TWO_TRIANGLES.surface_points();
        let mesh = Mesh::with_all_points(&points);
        let loops = vec![vec![0, 1, 2, 0], vec![0, 2, 3, 0]];
        assert_eq!(Some(0), mesh.outer_loop(&loops));
        assert_eq!(None, mesh.outer_loop(&[]));
    }

    #[test]
    fn filtering_records_problem_edges() {
        let points = TWO_TRIANGLES.surface_points();
        let mut meta = SurfaceMetadata::default();
        for i in [0, 1, 2] {
            meta.edge_points.insert(SurfacePointId(i));
        }
        let mut mesh = Mesh::new(&points);
        mesh.set_surface_metadata(&meta);
        mesh.build_3d(&TWO_TRIANGLES.cdt());

        let edges = mesh.boundary_edges(true);
        assert_eq!(2, edges.len());
        assert_eq!(
            [UEdge::new(0, 3), UEdge::new(2, 3)]
                .into_iter()
                .collect::<BTreeSet<_>>(),
            *mesh.problem_edges()
        );
        assert!(mesh.tri_problem_edges(Triangle::new(0, 2, 3)));
        assert!(!mesh.tri_problem_edges(Triangle::new(0, 1, 2)));
        // The point behind the problem edges counts as interior.
        assert_eq!(
            [3].into_iter().collect::<BTreeSet<_>>(),
            mesh.interior_points(true)
        );

        // Unfiltered queries clear the problem edges again.
        assert_eq!(4, mesh.boundary_edges(false).len());
        assert!(mesh.problem_edges().is_empty());
    }
}
