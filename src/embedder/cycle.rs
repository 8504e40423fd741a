use crate::graph::{Graph, VertexI};
use crate::invalid_graph;

/// An oriented simple cycle inside a biconnected component, with a
/// constant-time vertex-to-position map. The orientation defines which
/// side of the cycle is "inside"; both orientations are equally valid and
/// `reverse` switches between them.
pub struct Cycle {
    nodes: Vec<VertexI>,
    pos: Vec<Option<usize>>,
}

impl Cycle {
    /// Finds a seed cycle by walking a DFS trail from vertex 0 until a back
    /// edge closes it; the trail prefix before the second occurrence of the
    /// closing vertex is stripped. Requires a component that contains a
    /// cycle, i.e. a biconnected component on at least three vertices.
    pub fn new(component: &Graph) -> Cycle {
        Cycle::with_start(component, VertexI(0))
    }

    /// Same, but seeding the DFS at a chosen vertex; the start must reach
    /// a cycle of the component.
    pub fn with_start(component: &Graph, start: VertexI) -> Cycle {
        let mut visited = vec![false; component.vertex_count()];
        let mut trail = Vec::new();
        dfs_until_closed(component, start, None, &mut visited, &mut trail);
        let closing = match trail.last() {
            Some(&v) => v,
            None => invalid_graph!(),
        };
        let first = trail
            .iter()
            .position(|&v| v == closing)
            .unwrap_or_else(|| invalid_graph!());
        if first + 1 == trail.len() {
            // no back edge was found, the component is acyclic
            invalid_graph!();
        }
        let nodes: Vec<VertexI> = trail[first + 1..].to_vec();
        let mut cycle = Cycle {
            nodes,
            pos: vec![None; component.vertex_count()],
        };
        cycle.rebuild_positions();
        cycle
    }

    fn rebuild_positions(&mut self) {
        for slot in self.pos.iter_mut() {
            *slot = None;
        }
        for (position, &v) in self.nodes.iter().enumerate() {
            self.pos[v.0] = Some(position);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Size of the component the cycle lives in.
    pub fn component_size(&self) -> usize {
        self.pos.len()
    }

    pub fn node_at(&self, position: usize) -> VertexI {
        self.nodes[position]
    }

    pub fn position_of(&self, v: VertexI) -> Option<usize> {
        self.pos[v.0]
    }

    pub fn contains(&self, v: VertexI) -> bool {
        self.pos[v.0].is_some()
    }

    pub fn next_of(&self, v: VertexI) -> VertexI {
        let position = self.pos[v.0].unwrap_or_else(|| invalid_graph!());
        self.nodes[(position + 1) % self.nodes.len()]
    }

    pub fn prev_of(&self, v: VertexI) -> VertexI {
        let position = self.pos[v.0].unwrap_or_else(|| invalid_graph!());
        self.nodes[(position + self.nodes.len() - 1) % self.nodes.len()]
    }

    pub fn reverse(&mut self) {
        self.nodes.reverse();
        self.rebuild_positions();
    }

    /// Substitutes `path` for one of the two cycle arcs between its
    /// endpoints. Both endpoints must lie on the cycle. The arc that is
    /// *kept* is the one containing `node_to_include` if one is given; if
    /// it lies on the other arc, the cycle is reversed first so the node is
    /// retained.
    pub fn change_with_path(&mut self, path: &[VertexI], node_to_include: Option<VertexI>) {
        let first = path[0];
        let last = path[path.len() - 1];
        let mut new_cycle: Vec<VertexI> = path.to_vec();
        let mut i = self.pos[last.0].unwrap_or_else(|| invalid_graph!());
        i = (i + 1) % self.nodes.len();
        let mut found = node_to_include.is_none();
        while self.nodes[i] != first {
            new_cycle.push(self.nodes[i]);
            if Some(self.nodes[i]) == node_to_include {
                found = true;
            }
            i = (i + 1) % self.nodes.len();
        }
        if !found {
            self.reverse();
            self.change_with_path(path, node_to_include);
            return;
        }
        self.nodes = new_cycle.into_iter().rev().collect();
        self.rebuild_positions();
    }
}

fn dfs_until_closed(
    graph: &Graph,
    v: VertexI,
    prev: Option<VertexI>,
    visited: &mut Vec<bool>,
    trail: &mut Vec<VertexI>,
) {
    trail.push(v);
    visited[v.0] = true;
    for &w in graph.neighbors(v) {
        if Some(w) == prev {
            continue;
        }
        if !visited[w.0] {
            dfs_until_closed(graph, w, Some(v), visited, trail);
            break;
        }
        // back edge: record the closing vertex a second time and stop
        trail.push(w);
        return;
    }
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

    /// Undirected cyclic adjacency pairs, as a canonical set.
    fn cycle_edges(cycle: &Cycle) -> Vec<(usize, usize)> {
        (0..cycle.len())
            .map(|i| {
                let a = cycle.node_at(i).0;
                let b = cycle.node_at((i + 1) % cycle.len()).0;
                (a.min(b), a.max(b))
            })
            .sorted()
            .collect_vec()
    }

    #[test]
    fn test_seed_cycle_on_triangle() {
        let g = graph_from_edges(3, &[(0, 1), (1, 2), (2, 0)]);
        let cycle = Cycle::new(&g);
        assert_eq!(cycle.len(), 3);
        for v in g.vertices() {
            assert!(cycle.contains(v));
            assert_eq!(cycle.prev_of(cycle.next_of(v)), v);
        }
    }

    #[test]
    fn test_seed_cycle_strips_trail_prefix() {
        // the DFS from 0 enters the triangle 1-2-3 through the tail edge
        // (0, 1); the tail must not survive into the cycle
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]);
        let cycle = Cycle::new(&g);
        assert_eq!(cycle.len(), 3);
        assert!(!cycle.contains(VertexI(0)));
        assert_eq!(cycle_edges(&cycle), vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_change_with_path_substitutes_arc() {
        let g = graph_from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)],
        );
        let mut cycle = Cycle::new(&g);
        assert_eq!(cycle.len(), 6);
        assert!(cycle.position_of(VertexI(0)).is_some());
        assert!(cycle.position_of(VertexI(3)).is_some());
        // replace one arc between 0 and 3 by the chord
        cycle.change_with_path(&[VertexI(0), VertexI(3)], None);
        assert_eq!(cycle.len(), 4);
        assert!(cycle.contains(VertexI(0)));
        assert!(cycle.contains(VertexI(3)));
        let zero = VertexI(0);
        assert!(cycle.next_of(zero) == VertexI(3) || cycle.prev_of(zero) == VertexI(3));
    }

    #[test]
    fn test_change_with_path_keeps_included_node() {
        let g = graph_from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)],
        );
        let mut cycle = Cycle::new(&g);
        // one node from each arc between 0 and 3; each must survive when
        // asked for, so one of the two calls reverses the cycle first
        for keep in &[cycle.next_of(VertexI(3)), cycle.prev_of(VertexI(3))] {
            let mut rotated = Cycle::new(&g);
            rotated.change_with_path(&[VertexI(0), VertexI(3)], Some(*keep));
            assert_eq!(rotated.len(), 4);
            assert!(rotated.contains(*keep));
        }
        cycle.change_with_path(&[VertexI(0), VertexI(3)], None);
        assert_eq!(cycle.len(), 4);
    }

    #[test]
    fn test_change_with_sub_arc_is_idempotent() {
        let g = graph_from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let mut cycle = Cycle::new(&g);
        let before = cycle_edges(&cycle);
        let a = cycle.node_at(0);
        let b = cycle.node_at(1);
        let c = cycle.node_at(2);
        cycle.change_with_path(&[a, b, c], None);
        assert_eq!(cycle.len(), 5);
        assert_eq!(cycle_edges(&cycle), before);
    }

    #[test]
    fn test_reverse_flips_orientation() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let mut cycle = Cycle::new(&g);
        let v = VertexI(0);
        let next = cycle.next_of(v);
        cycle.reverse();
        assert_eq!(cycle.prev_of(v), next);
    }
}
