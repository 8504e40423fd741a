use std::fmt::{Debug, Formatter};

use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::{Graph, VertexI};
use crate::invalid_graph;

use self::Color::{Black, Blue, Red};

/// Color of an edge in a simultaneous-embedding instance: black edges are
/// shared by both input graphs, red and blue edges belong to exactly one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Color {
    Red,
    Blue,
    Black,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Red => "red",
            Blue => "blue",
            Black => "black",
        }
    }
}

/// Which colors of segment edges reach the cycle at an attachment vertex.
/// Black implies both sides, so it absorbs everything else.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttachmentColor {
    Red,
    Blue,
    RedAndBlue,
    Black,
}

impl AttachmentColor {
    /// Whether an attachment of this kind matters for the given edge
    /// color. Black attachments count for red and for blue alike.
    pub fn reaches(&self, color: Color) -> bool {
        match color {
            Red => matches!(self, AttachmentColor::Red | AttachmentColor::RedAndBlue | AttachmentColor::Black),
            Blue => matches!(self, AttachmentColor::Blue | AttachmentColor::RedAndBlue | AttachmentColor::Black),
            Black => matches!(self, AttachmentColor::Black),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct ColoredEdge {
    pub to: VertexI,
    pub color: Color,
}

/// Two graphs on a common vertex set, overlaid: every edge carries the
/// color saying which input(s) it came from. The black subgraph (the
/// intersection of the inputs) is maintained alongside, since the whole
/// SEFE recursion runs on cycles inside it.
#[derive(Clone)]
pub struct BicoloredGraph {
    adjacency: Vec<Vec<ColoredEdge>>,
    black_degree: Vec<usize>,
    intersection: Graph,
}

impl BicoloredGraph {
    pub fn new(number_of_vertices: usize) -> BicoloredGraph {
        BicoloredGraph {
            adjacency: vec![Vec::new(); number_of_vertices],
            black_degree: vec![0; number_of_vertices],
            intersection: Graph::new(number_of_vertices),
        }
    }

    /// Overlays two plain graphs: an edge present in both becomes black,
    /// one present in only the first becomes red, only the second blue.
    pub fn from_pair(red: &Graph, blue: &Graph) -> GraphResult<BicoloredGraph> {
        if red.vertex_count() != blue.vertex_count() {
            return GraphErr::new_err("SEFE inputs must share one vertex set");
        }
        let mut result = BicoloredGraph::new(red.vertex_count());
        for u in red.vertices() {
            let mut in_red = vec![false; red.vertex_count()];
            let mut in_blue = vec![false; red.vertex_count()];
            for &w in red.neighbors(u) {
                in_red[w.0] = true;
            }
            for &w in blue.neighbors(u) {
                in_blue[w.0] = true;
            }
            for v in red.vertices() {
                if u.0 >= v.0 {
                    continue;
                }
                match (in_red[v.0], in_blue[v.0]) {
                    (true, true) => result.add_edge(u, v, Black)?,
                    (true, false) => result.add_edge(u, v, Red)?,
                    (false, true) => result.add_edge(u, v, Blue)?,
                    (false, false) => {}
                }
            }
        }
        Ok(result)
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexI> {
        (0..self.adjacency.len()).map(VertexI)
    }

    pub fn edges_of(&self, v: VertexI) -> &[ColoredEdge] {
        &self.adjacency[v.0]
    }

    pub fn degree(&self, v: VertexI) -> usize {
        self.adjacency[v.0].len()
    }

    pub fn black_degree(&self, v: VertexI) -> usize {
        self.black_degree[v.0]
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum::<usize>() / 2
    }

    pub fn has_edge(&self, u: VertexI, v: VertexI) -> bool {
        self.adjacency[u.0].iter().any(|edge| edge.to == v)
    }

    pub fn add_edge(&mut self, u: VertexI, v: VertexI, color: Color) -> GraphResult<()> {
        if u.0 >= self.vertex_count() || v.0 >= self.vertex_count() {
            return GraphErr::new_err(&format!("Edge ({}, {}) is out of range", u, v));
        }
        if u == v {
            return GraphErr::new_err(&format!("Self-loop at {} is not allowed", u));
        }
        if self.has_edge(u, v) {
            return GraphErr::new_err(&format!("Edge ({}, {}) is already present", u, v));
        }
        self.push_arc(u, v, color);
        self.push_arc(v, u, color);
        if color == Black {
            self.intersection.add_edge(u, v)?;
        }
        Ok(())
    }

    /// Unchecked half-edge append; colored embeddings are assembled with
    /// this, one direction at a time.
    pub(crate) fn push_arc(&mut self, from: VertexI, to: VertexI, color: Color) {
        self.adjacency[from.0].push(ColoredEdge { to, color });
        if color == Black {
            self.black_degree[from.0] += 1;
        }
    }

    /// The black subgraph shared by both inputs.
    pub fn intersection(&self) -> &Graph {
        &self.intersection
    }

    /// The first input graph: red and black edges.
    pub fn red_graph(&self) -> Graph {
        self.monochromatic(Red)
    }

    /// The second input graph: blue and black edges.
    pub fn blue_graph(&self) -> Graph {
        self.monochromatic(Blue)
    }

    fn monochromatic(&self, keep: Color) -> Graph {
        let mut result = Graph::new(self.vertex_count());
        for u in self.vertices() {
            for edge in self.edges_of(u) {
                if (edge.color == keep || edge.color == Black) && u.0 < edge.to.0 {
                    result
                        .add_edge(u, edge.to)
                        .unwrap_or_else(|_| invalid_graph!());
                }
            }
        }
        result
    }
}

impl Debug for BicoloredGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.vertices() {
            write!(f, "node: {} neighbors: {} [", v.0, self.degree(v))?;
            for edge in self.edges_of(v) {
                write!(f, " ({} {})", edge.to.0, edge.color.as_str())?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}
