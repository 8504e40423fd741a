use std::collections::VecDeque;

use crate::graph::{Graph, VertexI};
use crate::invalid_graph;

use super::cycle::Cycle;

/// A segment of a cycle in a biconnected component: either a chord (a
/// single non-cycle edge between two cycle vertices) or a bridge (a
/// connected component of the rest of the graph plus its edges into the
/// cycle). The segment is itself a biconnected graph: its local vertices
/// `0 .. cycle.len()` are the cycle vertices at their cycle positions, the
/// bridge's internal vertices follow, and the cycle edges are included.
pub struct Segment {
    graph: Graph,
    component_map: Vec<VertexI>,
    attachments: Vec<VertexI>,
    is_attachment: Vec<bool>,
    cycle_len: usize,
}

impl Segment {
    fn new(number_of_vertices: usize, cycle_len: usize) -> Segment {
        Segment {
            graph: Graph::new(number_of_vertices),
            component_map: vec![VertexI(0); number_of_vertices],
            attachments: Vec::new(),
            is_attachment: vec![false; number_of_vertices],
            cycle_len,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The component vertex behind a segment-local one.
    pub fn component_vertex(&self, local: VertexI) -> VertexI {
        self.component_map[local.0]
    }

    /// The cycle vertices at which the segment meets the cycle, in
    /// discovery order. A segment of a biconnected component always has at
    /// least two of them.
    pub fn attachments(&self) -> &[VertexI] {
        &self.attachments
    }

    pub fn is_attachment(&self, local: VertexI) -> bool {
        self.is_attachment[local.0]
    }

    /// Whether the local vertex is one of the cycle copies (local index
    /// below the cycle length).
    pub fn on_cycle(&self, local: VertexI) -> bool {
        local.0 < self.cycle_len
    }

    fn add_attachment(&mut self, local: VertexI) {
        if self.is_attachment[local.0] {
            return;
        }
        self.is_attachment[local.0] = true;
        self.attachments.push(local);
    }

    /// A path-segment winds through the cycle as a simple arc: every
    /// non-attachment vertex keeps degree at most 2 within the segment.
    pub fn is_path(&self) -> bool {
        for v in self.graph.vertices() {
            if self.is_attachment(v) {
                continue;
            }
            if self.graph.degree(v) > 2 {
                return false;
            }
        }
        true
    }

    /// BFS path between two attachments that never hops directly from
    /// cycle vertex to cycle vertex, so the interior of the path lies in
    /// the bridge. Used to enlarge the cycle.
    pub fn path_between_attachments(&self, start: VertexI, end: VertexI) -> Vec<VertexI> {
        if !self.is_attachment(start) || !self.is_attachment(end) {
            invalid_graph!();
        }
        let mut prev: Vec<Option<VertexI>> = vec![None; self.graph.vertex_count()];
        let mut queue = VecDeque::new();
        queue.push_back(start);
        'search: while let Some(v) = queue.pop_front() {
            for &w in self.graph.neighbors(v) {
                if self.on_cycle(v) && self.on_cycle(w) {
                    continue;
                }
                if prev[w.0].is_none() && w != start {
                    prev[w.0] = Some(v);
                    if w == end {
                        break 'search;
                    }
                    queue.push_back(w);
                }
            }
        }
        let mut path = vec![end];
        let mut crawl = end;
        while crawl != start {
            crawl = prev[crawl.0].unwrap_or_else(|| invalid_graph!());
            path.push(crawl);
        }
        path.reverse();
        path
    }
}

/// Enumerates the segments of `cycle` in `component`: one bridge per
/// connected component of the graph minus the cycle, then one chord per
/// non-cycle edge joining two cycle vertices.
pub fn segments_of(component: &Graph, cycle: &Cycle) -> Vec<Segment> {
    let mut segments = Vec::new();
    find_bridges(component, cycle, &mut segments);
    find_chords(component, cycle, &mut segments);
    segments
}

fn find_bridges(component: &Graph, cycle: &Cycle, segments: &mut Vec<Segment>) {
    let mut visited: Vec<bool> = component
        .vertices()
        .map(|v| cycle.contains(v))
        .collect();
    for v in component.vertices() {
        if !visited[v.0] {
            let mut nodes = Vec::new();
            let mut edges = Vec::new();
            collect_bridge(component, cycle, v, &mut visited, &mut nodes, &mut edges);
            segments.push(build_bridge(component, cycle, &nodes, &edges));
        }
    }
}

/// DFS over the non-cycle vertices reachable from `v`. Collects the
/// internal vertices and every incident edge; edges landing on the cycle
/// are kept (they become attachments), cycle edges themselves are not
/// walked.
fn collect_bridge(
    component: &Graph,
    cycle: &Cycle,
    v: VertexI,
    visited: &mut Vec<bool>,
    nodes: &mut Vec<VertexI>,
    edges: &mut Vec<(VertexI, VertexI)>,
) {
    nodes.push(v);
    visited[v.0] = true;
    for &w in component.neighbors(v) {
        if cycle.contains(w) {
            edges.push((v, w));
            continue;
        }
        if v.0 < w.0 {
            edges.push((v, w));
        }
        if !visited[w.0] {
            collect_bridge(component, cycle, w, visited, nodes, edges);
        }
    }
}

fn find_chords(component: &Graph, cycle: &Cycle, segments: &mut Vec<Segment>) {
    for position in 0..cycle.len() {
        let v = cycle.node_at(position);
        for &w in component.neighbors(v) {
            // visit each unordered pair once
            if v.0 < w.0 {
                continue;
            }
            if cycle.contains(w) && w != cycle.prev_of(v) && w != cycle.next_of(v) {
                segments.push(build_chord(cycle, v, w));
            }
        }
    }
}

fn copy_cycle_vertices(segment: &mut Segment, cycle: &Cycle) {
    for position in 0..cycle.len() {
        segment.component_map[position] = cycle.node_at(position);
    }
}

fn add_cycle_edges(segment: &mut Segment, cycle_len: usize) {
    for i in 0..cycle_len - 1 {
        segment
            .graph
            .add_edge(VertexI(i), VertexI(i + 1))
            .unwrap_or_else(|_| invalid_graph!());
    }
    segment
        .graph
        .add_edge(VertexI(0), VertexI(cycle_len - 1))
        .unwrap_or_else(|_| invalid_graph!());
}

fn build_bridge(
    component: &Graph,
    cycle: &Cycle,
    nodes: &[VertexI],
    edges: &[(VertexI, VertexI)],
) -> Segment {
    let mut segment = Segment::new(nodes.len() + cycle.len(), cycle.len());
    copy_cycle_vertices(&mut segment, cycle);
    let mut local_of: Vec<Option<usize>> = vec![None; component.vertex_count()];
    for position in 0..cycle.len() {
        local_of[cycle.node_at(position).0] = Some(position);
    }
    for (i, &internal) in nodes.iter().enumerate() {
        let local = i + cycle.len();
        local_of[internal.0] = Some(local);
        segment.component_map[local] = internal;
    }
    for &(u, v) in edges {
        let lu = VertexI(local_of[u.0].unwrap_or_else(|| invalid_graph!()));
        let lv = VertexI(local_of[v.0].unwrap_or_else(|| invalid_graph!()));
        segment
            .graph
            .add_edge(lu, lv)
            .unwrap_or_else(|_| invalid_graph!());
        if cycle.contains(u) {
            segment.add_attachment(lu);
        }
        if cycle.contains(v) {
            segment.add_attachment(lv);
        }
    }
    add_cycle_edges(&mut segment, cycle.len());
    segment
}

fn build_chord(cycle: &Cycle, a: VertexI, b: VertexI) -> Segment {
    let mut chord = Segment::new(cycle.len(), cycle.len());
    copy_cycle_vertices(&mut chord, cycle);
    add_cycle_edges(&mut chord, cycle.len());
    let pa = cycle.position_of(a).unwrap_or_else(|| invalid_graph!());
    let pb = cycle.position_of(b).unwrap_or_else(|| invalid_graph!());
    chord
        .graph
        .add_edge(VertexI(pa), VertexI(pb))
        .unwrap_or_else(|_| invalid_graph!());
    chord.add_attachment(VertexI(pa));
    chord.add_attachment(VertexI(pb));
    chord
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
    fn test_theta_yields_single_path_chord() {
        let g = graph_from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)],
        );
        let cycle = Cycle::new(&g);
        assert_eq!(cycle.len(), 6);
        let segments = segments_of(&g, &cycle);
        assert_eq!(segments.len(), 1);
        let chord = &segments[0];
        assert_eq!(chord.graph().vertex_count(), 6);
        assert_eq!(chord.attachments().len(), 2);
        assert!(chord.is_path());
        let attached = chord
            .attachments()
            .iter()
            .map(|&a| chord.component_vertex(a).0)
            .sorted()
            .collect_vec();
        assert_eq!(attached, vec![0, 3]);
    }

    #[test]
    fn test_k4_bridge_attachments() {
        let g = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let cycle = Cycle::new(&g);
        assert_eq!(cycle.len(), 3);
        let segments = segments_of(&g, &cycle);
        assert_eq!(segments.len(), 1);
        let bridge = &segments[0];
        assert_eq!(bridge.graph().vertex_count(), 4);
        assert_eq!(bridge.attachments().len(), 3);
        assert!(!bridge.is_path());
    }

    #[test]
    fn test_bridge_path_avoids_cycle() {
        let g = graph_from_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
        let cycle = Cycle::new(&g);
        let segments = segments_of(&g, &cycle);
        let bridge = &segments[0];
        let a = bridge.attachments()[0];
        let b = bridge.attachments()[1];
        let path = bridge.path_between_attachments(a, b);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], a);
        assert_eq!(path[2], b);
        assert!(!bridge.on_cycle(path[1]));
    }

    #[test]
    fn test_segment_local_cycle_positions() {
        let g = graph_from_edges(
            5,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 4)],
        );
        let cycle = Cycle::new(&g);
        let segments = segments_of(&g, &cycle);
        assert_eq!(segments.len(), 1);
        let chord = &segments[0];
        for position in 0..cycle.len() {
            assert_eq!(
                chord.component_vertex(VertexI(position)),
                cycle.node_at(position)
            );
        }
    }
}
