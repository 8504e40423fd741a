//! Planarity testing, combinatorial embedding and simultaneous embedding
//! with fixed edges (SEFE), via the Auslander-Parter recursion over
//! biconnected components, cycles, segments and their interlacement.

pub mod embedder;
pub mod graph;
pub mod sefe;
pub mod util;

pub use crate::embedder::{embed as embed_planar, Embedding};
pub use crate::graph::{Graph, SubGraph, VertexI};
pub use crate::sefe::bicolored::{BicoloredGraph, Color};
pub use crate::sefe::{embed as embed_sefe, test_sefe, EmbeddingSefe};
