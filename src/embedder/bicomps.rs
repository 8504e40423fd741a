use crate::graph::{Graph, SubGraph, VertexI};
use crate::invalid_graph;

/// The biconnected components of a graph together with its cut vertices,
/// found by a single lowpoint DFS. Every edge of the input lands in exactly
/// one component; every cut vertex belongs to at least two. Components are
/// emitted in the order their roots close in the DFS, which is
/// deterministic for a fixed adjacency order but not part of the contract.
pub struct BiconnectedComponents {
    components: Vec<SubGraph>,
    cut_vertices: Vec<VertexI>,
}

struct DfsState<'a> {
    graph: &'a Graph,
    discovery: Vec<Option<usize>>,
    low: Vec<usize>,
    parent: Vec<Option<VertexI>>,
    next_id: usize,
    is_cut: Vec<bool>,
    components: Vec<SubGraph>,
}

impl BiconnectedComponents {
    pub fn decompose(graph: &Graph) -> BiconnectedComponents {
        let n = graph.vertex_count();
        let mut state = DfsState {
            graph,
            discovery: vec![None; n],
            low: vec![0; n],
            parent: vec![None; n],
            next_id: 0,
            is_cut: vec![false; n],
            components: Vec::new(),
        };
        for v in graph.vertices() {
            if state.discovery[v.0].is_none() {
                let mut nodes = Vec::new();
                let mut edges = Vec::new();
                dfs(&mut state, v, &mut nodes, &mut edges);
                // every edge of the root's component was closed inside
                debug_assert!(nodes.is_empty() && edges.is_empty());
            }
        }
        let cut_vertices = (0..n).filter(|&v| state.is_cut[v]).map(VertexI).collect();
        BiconnectedComponents {
            components: state.components,
            cut_vertices,
        }
    }

    pub fn components(&self) -> &[SubGraph] {
        &self.components
    }

    pub fn cut_vertices(&self) -> &[VertexI] {
        &self.cut_vertices
    }
}

/// Lowpoint DFS. Each tree branch carries its own stack of vertices and
/// edges; when `low[child] >= discovery[v]` the branch stack is exactly one
/// biconnected component (plus `v` itself), otherwise it is spliced into
/// the caller's stack.
fn dfs(
    state: &mut DfsState,
    v: VertexI,
    nodes: &mut Vec<VertexI>,
    edges: &mut Vec<(VertexI, VertexI)>,
) {
    let id = state.next_id;
    state.next_id += 1;
    state.discovery[v.0] = Some(id);
    state.low[v.0] = id;
    let mut children = 0;
    for &w in state.graph.neighbors(v) {
        if state.parent[v.0] == Some(w) {
            continue;
        }
        match state.discovery[w.0] {
            None => {
                children += 1;
                state.parent[w.0] = Some(v);
                let mut branch_nodes = vec![w];
                let mut branch_edges = vec![(v, w)];
                dfs(state, w, &mut branch_nodes, &mut branch_edges);
                if state.low[w.0] < state.low[v.0] {
                    state.low[v.0] = state.low[w.0];
                }
                if state.low[w.0] >= id {
                    branch_nodes.push(v);
                    let component = build_component(state.graph, &branch_nodes, &branch_edges);
                    state.components.push(component);
                    if state.parent[v.0].is_some() {
                        // the root is handled after the loop
                        state.is_cut[v.0] = true;
                    }
                } else {
                    nodes.append(&mut branch_nodes);
                    edges.append(&mut branch_edges);
                }
            }
            Some(w_id) if w_id < id => {
                // back edge
                edges.push((v, w));
                if w_id < state.low[v.0] {
                    state.low[v.0] = w_id;
                }
            }
            _ => {}
        }
    }
    if state.parent[v.0].is_none() {
        if children >= 2 {
            state.is_cut[v.0] = true;
        } else if children == 0 {
            // isolated vertex, a trivial component of its own
            let mut component = SubGraph::new(1);
            component.set_original(VertexI(0), v);
            state.components.push(component);
        }
    }
}

fn build_component(graph: &Graph, nodes: &[VertexI], edges: &[(VertexI, VertexI)]) -> SubGraph {
    let mut component = SubGraph::new(nodes.len());
    let mut local_of = vec![None; graph.vertex_count()];
    for (local, &original) in nodes.iter().enumerate() {
        local_of[original.0] = Some(local);
        component.set_original(VertexI(local), original);
    }
    for &(u, v) in edges {
        let u = local_of[u.0].unwrap_or_else(|| invalid_graph!());
        let v = local_of[v.0].unwrap_or_else(|| invalid_graph!());
        component
            .add_edge(VertexI(u), VertexI(v))
            .unwrap_or_else(|_| invalid_graph!());
    }
    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(VertexI(u), VertexI(v)).expect("test edge");
        }
        g
    }

    #[test]
    fn test_two_triangles_sharing_a_vertex() {
        let g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)]);
        let bicomps = BiconnectedComponents::decompose(&g);
        assert_eq!(bicomps.components().len(), 2);
        assert_eq!(bicomps.cut_vertices(), &[VertexI(2)]);
        let total_edges: usize = bicomps
            .components()
            .iter()
            .map(|c| c.graph().edge_count())
            .sum();
        assert_eq!(total_edges, g.edge_count());
        for component in bicomps.components() {
            assert_eq!(component.vertex_count(), 3);
        }
    }

    #[test]
    fn test_path_decomposes_into_single_edges() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let bicomps = BiconnectedComponents::decompose(&g);
        assert_eq!(bicomps.components().len(), 3);
        assert_eq!(bicomps.cut_vertices(), &[VertexI(1), VertexI(2)]);
        for component in bicomps.components() {
            assert_eq!(component.vertex_count(), 2);
            assert_eq!(component.graph().edge_count(), 1);
        }
    }

    #[test]
    fn test_isolated_vertex_is_trivial_component() {
        let g = graph_from_edges(3, &[(0, 1)]);
        let bicomps = BiconnectedComponents::decompose(&g);
        assert_eq!(bicomps.components().len(), 2);
        let sizes = bicomps
            .components()
            .iter()
            .map(|c| c.vertex_count())
            .sorted()
            .collect_vec();
        assert_eq!(sizes, vec![1, 2]);
        assert!(bicomps.cut_vertices().is_empty());
    }

    #[test]
    fn test_biconnected_graph_is_one_component() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let bicomps = BiconnectedComponents::decompose(&g);
        assert_eq!(bicomps.components().len(), 1);
        assert!(bicomps.cut_vertices().is_empty());
        assert_eq!(bicomps.components()[0].graph().edge_count(), 5);
    }
}
