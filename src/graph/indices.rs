use std::fmt;

/// Dense index of a vertex within its owning graph. Subgraphs renumber
/// their vertices from zero, so a vertex is identified by the pair of
/// graph and index; relations between graphs are arrays of these indices,
/// never pointers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct VertexI(pub usize);

impl fmt::Display for VertexI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
