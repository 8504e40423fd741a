use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};

use array_tool::vec::Intersect;

use self::error::{GraphErr, GraphResult};
pub use self::indices::VertexI;

pub mod error;
pub mod indices;
pub mod io;

#[macro_export]
macro_rules! invalid_graph {
    () => {
        panic!("Assertion failed, referential integrity of graph obstructed.")
    };
}

/// An undirected simple graph on the vertices `0 .. n-1` with one ordered
/// neighbor list per vertex. In a plain graph the order of a neighbor list
/// is insertion order and carries no meaning; in an embedding the very same
/// representation is read as the cyclic order of incident edges around the
/// vertex in a planar drawing.
#[derive(Clone)]
pub struct Graph {
    adjacency: Vec<Vec<VertexI>>,
}

impl Graph {
    pub fn new(number_of_vertices: usize) -> Graph {
        Graph {
            adjacency: vec![Vec::new(); number_of_vertices],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexI> {
        (0..self.adjacency.len()).map(VertexI)
    }

    pub fn neighbors(&self, v: VertexI) -> &[VertexI] {
        &self.adjacency[v.0]
    }

    pub fn degree(&self, v: VertexI) -> usize {
        self.adjacency[v.0].len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|nbs| nbs.len()).sum::<usize>() / 2
    }

    pub fn has_edge(&self, u: VertexI, v: VertexI) -> bool {
        // scan the shorter of the two lists
        let (u, v) = if self.degree(u) > self.degree(v) {
            (v, u)
        } else {
            (u, v)
        };
        self.adjacency[u.0].contains(&v)
    }

    /// Inserts the undirected edge `(u, v)`, appending each endpoint to the
    /// other's neighbor list. Self-loops, duplicates and out-of-range
    /// endpoints are rejected.
    pub fn add_edge(&mut self, u: VertexI, v: VertexI) -> GraphResult<()> {
        if u.0 >= self.vertex_count() || v.0 >= self.vertex_count() {
            return GraphErr::new_err(&format!("Edge ({}, {}) is out of range", u, v));
        }
        if u == v {
            return GraphErr::new_err(&format!("Self-loop at {} is not allowed", u));
        }
        if self.has_edge(u, v) {
            return GraphErr::new_err(&format!("Edge ({}, {}) is already present", u, v));
        }
        self.adjacency[u.0].push(v);
        self.adjacency[v.0].push(u);
        Ok(())
    }

    /// Appends the half-edge `from -> to` without any validity checks.
    /// Embeddings are assembled through this; they re-emit each input edge
    /// twice, once per direction, in the chosen cyclic order.
    pub(crate) fn push_arc(&mut self, from: VertexI, to: VertexI) {
        self.adjacency[from.0].push(to);
    }

    pub fn is_connected(&self) -> bool {
        if self.adjacency.is_empty() {
            return true;
        }
        let mut visited = vec![false; self.vertex_count()];
        let mut queue = VecDeque::new();
        visited[0] = true;
        queue.push_back(VertexI(0));
        while let Some(v) = queue.pop_front() {
            for &w in self.neighbors(v) {
                if !visited[w.0] {
                    visited[w.0] = true;
                    queue.push_back(w);
                }
            }
        }
        visited.into_iter().all(|seen| seen)
    }

    /// The graph on the same vertex set containing exactly the edges present
    /// in both `self` and `other`.
    pub fn intersection(&self, other: &Graph) -> GraphResult<Graph> {
        if self.vertex_count() != other.vertex_count() {
            return GraphErr::new_err("Intersection requires graphs on the same vertex set");
        }
        let mut result = Graph::new(self.vertex_count());
        for u in self.vertices() {
            let common = self.adjacency[u.0].intersect(other.adjacency[u.0].clone());
            for v in common {
                if u.0 < v.0 {
                    result.add_edge(u, v)?;
                }
            }
        }
        Ok(result)
    }

    /// Two-colors the vertices so that every edge joins distinct colors, or
    /// returns `None` as soon as an odd cycle is found. One BFS per
    /// connected component.
    pub fn bipartition(&self) -> Option<Vec<u8>> {
        let mut coloring: Vec<Option<u8>> = vec![None; self.vertex_count()];
        for start in self.vertices() {
            if coloring[start.0].is_some() {
                continue;
            }
            coloring[start.0] = Some(0);
            let mut queue = VecDeque::new();
            queue.push_back(start);
            while let Some(v) = queue.pop_front() {
                let color = coloring[v.0].unwrap_or_else(|| invalid_graph!());
                for &w in self.neighbors(v) {
                    match coloring[w.0] {
                        None => {
                            coloring[w.0] = Some(1 - color);
                            queue.push_back(w);
                        }
                        Some(other) if other == color => return None,
                        _ => {}
                    }
                }
            }
        }
        Some(coloring.into_iter().map(|c| c.unwrap_or(0)).collect())
    }
}

impl Debug for Graph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.vertices() {
            write!(f, "node [{}]: neighbors: [", v.0)?;
            for w in self.neighbors(v) {
                write!(f, " {}", w.0)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

/// A graph together with an injection of its local vertices into the
/// vertices of a designated parent graph. Biconnected components and
/// segments are represented this way so that they are first-class graphs
/// while identity across the recursion is preserved.
pub struct SubGraph {
    graph: Graph,
    originals: Vec<Option<VertexI>>,
}

impl SubGraph {
    pub fn new(number_of_vertices: usize) -> SubGraph {
        SubGraph {
            graph: Graph::new(number_of_vertices),
            originals: vec![None; number_of_vertices],
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn add_edge(&mut self, u: VertexI, v: VertexI) -> GraphResult<()> {
        self.graph.add_edge(u, v)
    }

    pub fn set_original(&mut self, local: VertexI, original: VertexI) {
        self.originals[local.0] = Some(original);
    }

    /// The parent-graph vertex behind a local one. The mapping must have
    /// been written while the subgraph was built.
    pub fn original(&self, local: VertexI) -> VertexI {
        match self.originals[local.0] {
            Some(original) => original,
            None => invalid_graph!(),
        }
    }
}

impl Debug for SubGraph {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.vertices() {
            write!(
                f,
                "node: {} neighbors: {} [",
                self.original(v).0,
                self.graph.degree(v)
            )?;
            for &w in self.graph.neighbors(v) {
                write!(f, " {}", self.original(w).0)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(VertexI(u), VertexI(v)).expect("test edge");
        }
        g
    }

    #[test]
    fn test_add_edge_rejects_invalid_input() {
        let mut g = Graph::new(3);
        assert!(g.add_edge(VertexI(0), VertexI(0)).is_err());
        assert!(g.add_edge(VertexI(0), VertexI(3)).is_err());
        g.add_edge(VertexI(0), VertexI(1)).expect("first insertion");
        assert!(g.add_edge(VertexI(1), VertexI(0)).is_err());
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_neighbor_order_is_insertion_order() {
        let g = graph_from_edges(4, &[(0, 2), (0, 1), (0, 3)]);
        assert_eq!(g.neighbors(VertexI(0)), &[VertexI(2), VertexI(1), VertexI(3)]);
    }

    #[test]
    fn test_connectivity() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        assert!(g.is_connected());
        let h = graph_from_edges(4, &[(0, 1), (2, 3)]);
        assert!(!h.is_connected());
    }

    #[test]
    fn test_bipartition_even_and_odd_cycle() {
        let even = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let coloring = even.bipartition().expect("4-cycle is bipartite");
        assert_eq!(coloring[0], coloring[2]);
        assert_eq!(coloring[1], coloring[3]);
        assert_ne!(coloring[0], coloring[1]);

        let odd = graph_from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        assert!(odd.bipartition().is_none());
    }

    #[test]
    fn test_intersection() {
        let a = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let b = graph_from_edges(4, &[(1, 2), (2, 3), (3, 0)]);
        let i = a.intersection(&b).expect("same vertex set");
        assert_eq!(i.edge_count(), 2);
        assert!(i.has_edge(VertexI(1), VertexI(2)));
        assert!(i.has_edge(VertexI(2), VertexI(3)));
        assert!(!i.has_edge(VertexI(0), VertexI(1)));
    }

    #[test]
    fn test_subgraph_back_map() {
        let mut s = SubGraph::new(2);
        s.set_original(VertexI(0), VertexI(7));
        s.set_original(VertexI(1), VertexI(4));
        s.add_edge(VertexI(0), VertexI(1)).expect("test edge");
        assert_eq!(s.original(VertexI(0)), VertexI(7));
        assert_eq!(s.original(VertexI(1)), VertexI(4));
    }
}
