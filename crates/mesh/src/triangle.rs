/// Index of a vertex in a mesh's point table.
pub type VertexId = u32;

/// A facet stored as three vertex indices.
///
/// The order of the indices defines the winding, and with it the facet's
/// orientation. Two triangles over the same vertices with opposite windings
/// are different triangles. Rotations of the same winding are also kept
/// distinct; no canonical form is applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(C)]
pub struct Triangle {
    pub v: [VertexId; 3],
}

static_assertions::assert_eq_size!(Triangle, [u32; 3]);

impl Triangle {
    pub fn new(a: VertexId, b: VertexId, c: VertexId) -> Self {
        Self { v: [a, b, c] }
    }

    /// True if any two of the indices are equal.
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.v;
        a == b || b == c || c == a
    }

    /// The three directed edges in winding order: `v0->v1`, `v1->v2`, `v2->v0`.
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.v;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    pub fn uedges(&self) -> [UEdge; 3] {
        self.edges().map(UEdge::from)
    }
}

/// An edge as traversed by a triangle's winding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }
}

/// An edge identified only by its endpoints.
///
/// Always stored as `(lo, hi)` with `lo <= hi` so that both traversal
/// directions compare and hash equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UEdge {
    pub lo: VertexId,
    pub hi: VertexId,
}

impl UEdge {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn endpoints(&self) -> [VertexId; 2] {
        [self.lo, self.hi]
    }
}

impl From<Edge> for UEdge {
    fn from(e: Edge) -> Self {
        UEdge::new(e.from, e.to)
    }
}
