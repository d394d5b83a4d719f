use std::collections::BTreeSet;

use log::{trace, warn};
use patchwork_mesh::{Edge, Triangle, UEdge, VertexId};

use crate::mesh::Mesh;

impl<'s> Mesh<'s> {
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.triangles.iter()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn contains_triangle(&self, t: &Triangle) -> bool {
        self.triangles.contains(t)
    }

    /// Number of stored triangles that have `e` as an edge.
    pub fn incidence(&self, e: UEdge) -> usize {
        self.uedge_triangles.get(&e).map_or(0, |s| s.len())
    }

    /// Every undirected edge with at least one incident triangle, with its
    /// incidence count.
    pub fn uedges(&self) -> impl Iterator<Item = (UEdge, usize)> + '_ {
        self.uedge_triangles.iter().map(|(e, s)| (*e, s.len()))
    }

    /// The triangle that winds through `e` in that direction.
    pub fn edge_triangle(&self, e: Edge) -> Option<Triangle> {
        self.edge_triangle.get(&e).copied()
    }

    /// Directed edges leaving `v`.
    pub fn vertex_edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.vertex_edges.get(&v).into_iter().flatten().copied()
    }

    /// Oriented boundary edges that start or end at `v`.
    pub fn boundary_vertex_edges(&self, v: VertexId) -> impl Iterator<Item = Edge> + '_ {
        self.boundary_vertex_edges
            .get(&v)
            .into_iter()
            .flatten()
            .copied()
    }

    /// For each edge of `t`, every other triangle sharing that edge.
    ///
    /// A triangle sharing two edges with `t` is listed twice. `t` itself does
    /// not need to be stored in the mesh.
    pub fn face_neighbors(&self, t: Triangle) -> Vec<Triangle> {
        let mut result = Vec::new();
        for e in t.uedges() {
            if let Some(faces) = self.uedge_triangles.get(&e) {
                result.extend(faces.iter().filter(|&&f| f != t).copied());
            }
        }
        result
    }

    /// All triangles incident to `v`.
    pub fn vertex_face_neighbors(&self, v: VertexId) -> Vec<Triangle> {
        self.vertex_triangles
            .get(&v)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Triangles sharing at least one vertex with `t`, including `t` if it is
    /// stored.
    pub(crate) fn vertex_neighborhood(&self, t: Triangle) -> BTreeSet<Triangle> {
        t.v.iter()
            .filter_map(|v| self.vertex_triangles.get(v))
            .flatten()
            .copied()
            .collect()
    }

    /// Inserts `t` and updates every adjacency map.
    ///
    /// Degenerate and already stored triangles are not inserted but still
    /// report `true`; there is nothing wrong with the mesh afterwards.
    ///
    /// With `validate`, the insertion is undone and `false` returned if it
    /// leaves any of `t`'s vertices touching more than two boundary edges,
    /// i.e. if the boundary stops being a set of simple loops there.
    pub fn add_triangle(&mut self, t: Triangle, validate: bool) -> bool {
        if t.is_degenerate() {
            trace!("skipping degenerate triangle {:?}", t.v);
            return true;
        }
        if !self.triangles.insert(t) {
            return true;
        }

        for v in t.v {
            self.vertex_triangles.entry(v).or_default().insert(t);
        }
        for e in t.edges() {
            self.edge_triangle.insert(e, t);
            self.vertex_edges.entry(e.from).or_default().insert(e);
            self.uedge_triangles.entry(e.into()).or_default().insert(t);
        }

        // The new incidence counts may move edges in or out of the boundary.
        for e in t.uedges() {
            self.refresh_boundary(e);
        }

        if validate {
            let overloaded = t.v.iter().find(|&&v| {
                self.boundary_vertex_edges
                    .get(&v)
                    .map_or(0, |s| s.len())
                    > 2
            });
            if let Some(&v) = overloaded {
                warn!(
                    "triangle {:?} pinches the boundary at vertex {}, rejecting",
                    t.v, v
                );
                self.remove_triangle(t);
                return false;
            }
        }

        trace!("added triangle {:?}, {} stored", t.v, self.triangles.len());
        true
    }

    /// Removes `t` from the triangle set and every adjacency map.
    ///
    /// Returns `false`, changing nothing, if `t` is not stored.
    pub fn remove_triangle(&mut self, t: Triangle) -> bool {
        if !self.triangles.remove(&t) {
            return false;
        }

        for v in t.v {
            if let Some(faces) = self.vertex_triangles.get_mut(&v) {
                faces.remove(&t);
                if faces.is_empty() {
                    self.vertex_triangles.remove(&v);
                }
            }
        }

        for e in t.edges() {
            let ue = UEdge::from(e);
            if let Some(faces) = self.uedge_triangles.get_mut(&ue) {
                faces.remove(&t);
                if faces.is_empty() {
                    self.uedge_triangles.remove(&ue);
                }
            }

            // Another triangle may wind through the same directed edge; hand
            // the edge over to it instead of dropping it.
            let heir = self
                .uedge_triangles
                .get(&ue)
                .and_then(|faces| faces.iter().find(|f| f.edges().contains(&e)))
                .copied();
            match heir {
                Some(f) => {
                    self.edge_triangle.insert(e, f);
                }
                None => {
                    self.edge_triangle.remove(&e);
                    if let Some(edges) = self.vertex_edges.get_mut(&e.from) {
                        edges.remove(&e);
                        if edges.is_empty() {
                            self.vertex_edges.remove(&e.from);
                        }
                    }
                }
            }
        }

        for e in t.uedges() {
            self.refresh_boundary(e);
        }
        true
    }

    // Re-derives the boundary state of `e` from its incidence count.
    fn refresh_boundary(&mut self, e: UEdge) {
        for v in e.endpoints() {
            if let Some(edges) = self.boundary_vertex_edges.get_mut(&v) {
                edges.retain(|d| UEdge::from(*d) != e);
                if edges.is_empty() {
                    self.boundary_vertex_edges.remove(&v);
                }
            }
        }

        let owner = match self.uedge_triangles.get(&e) {
            Some(faces) if faces.len() == 1 => faces.iter().next().copied(),
            _ => None,
        };
        let oriented = owner.and_then(|f| f.edges().into_iter().find(|d| UEdge::from(*d) == e));
        match oriented {
            Some(d) => {
                self.current_boundary.insert(e);
                for v in e.endpoints() {
                    self.boundary_vertex_edges.entry(v).or_default().insert(d);
                }
            }
            None => {
                self.current_boundary.remove(&e);
            }
        }
    }
}
