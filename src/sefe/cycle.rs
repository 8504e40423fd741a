use crate::embedder::cycle::Cycle;
use crate::graph::VertexI;

use super::segment::BicoloredSegment;

/// A cycle lying entirely in the black subgraph of a bicolored graph. The
/// SEFE recursion runs on these: segments are taken around them, and path
/// substitution only ever splices in black paths, so the cycle stays
/// black. Positions, rotation and orientation behave exactly as for the
/// monochromatic cycle underneath.
pub struct IntersectionCycle {
    inner: Cycle,
}

impl IntersectionCycle {
    /// Seeds the cycle inside the black subgraph of the segment, starting
    /// from a vertex that carries black edges. Assumes the black subgraph
    /// (minus black-isolated vertices) is biconnected, which holds at the
    /// top level by precondition and is preserved down the recursion.
    pub fn new(segment: &BicoloredSegment) -> IntersectionCycle {
        let intersection = segment.graph().intersection();
        let start = intersection
            .vertices()
            .find(|&v| intersection.degree(v) > 0)
            .unwrap_or(VertexI(0));
        IntersectionCycle {
            inner: Cycle::with_start(intersection, start),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn graph_size(&self) -> usize {
        self.inner.component_size()
    }

    pub fn node_at(&self, position: usize) -> VertexI {
        self.inner.node_at(position)
    }

    pub fn position_of(&self, v: VertexI) -> Option<usize> {
        self.inner.position_of(v)
    }

    pub fn contains(&self, v: VertexI) -> bool {
        self.inner.contains(v)
    }

    pub fn next_of(&self, v: VertexI) -> VertexI {
        self.inner.next_of(v)
    }

    pub fn prev_of(&self, v: VertexI) -> VertexI {
        self.inner.prev_of(v)
    }

    pub fn reverse(&mut self) {
        self.inner.reverse()
    }

    /// Substitutes a black path for one cycle arc; see the monochromatic
    /// counterpart. The caller guarantees the path is black.
    pub fn change_with_path(&mut self, path: &[VertexI], node_to_include: Option<VertexI>) {
        self.inner.change_with_path(path, node_to_include)
    }
}
