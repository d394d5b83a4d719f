use patchwork_mesh::{Triangle, UEdge, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TopologyError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// The boundary walk reached a vertex without exactly one way forward.
    #[error("boundary is not manifold at vertex {vertex}: {candidates} candidate edges")]
    NonManifoldBoundary { vertex: VertexId, candidates: usize },

    /// Every boundary edge was consumed before the walk returned to its start.
    #[error("boundary loop starting at vertex {start} ended at vertex {end}")]
    UnclosedLoop { start: VertexId, end: VertexId },

    /// A boundary edge has no single owning triangle to orient it.
    #[error("no oriented edge for boundary edge {}-{}", .edge.lo, .edge.hi)]
    MissingOrientedEdge { edge: UEdge },

    /// A flipped triangle has exactly two vertices on the surface edge. These
    /// should have been filtered out as problem edges.
    #[error("flipped triangle {:?} has two surface edge vertices", .triangle.v)]
    UnculledProblemTriangle { triangle: Triangle },
}
