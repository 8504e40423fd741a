use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};

use crate::graph::VertexI;
use crate::invalid_graph;

use super::bicolored::{AttachmentColor, BicoloredGraph, Color};
use super::cycle::IntersectionCycle;

/// A segment of an intersection cycle in a bicolored graph. Shaped like
/// the monochromatic segment (cycle copies first, bridge interior after,
/// cycle edges included), but every edge carries its color, and every
/// attachment records which colors reach it. The recursion re-enters
/// through these, so the whole input graph is wrapped as a degenerate
/// segment at the top.
pub struct BicoloredSegment {
    graph: BicoloredGraph,
    parent_map: Vec<VertexI>,
    original_map: Vec<VertexI>,
    attachments: Vec<VertexI>,
    attachment_colors: Vec<Option<AttachmentColor>>,
    cycle_len: usize,
}

impl BicoloredSegment {
    fn new(number_of_vertices: usize, cycle_len: usize) -> BicoloredSegment {
        BicoloredSegment {
            graph: BicoloredGraph::new(number_of_vertices),
            parent_map: vec![VertexI(0); number_of_vertices],
            original_map: vec![VertexI(0); number_of_vertices],
            attachments: Vec::new(),
            attachment_colors: vec![None; number_of_vertices],
            cycle_len,
        }
    }

    /// Wraps a whole bicolored graph as the root of the recursion: the
    /// identity maps, no attachments, no surrounding cycle.
    pub fn wrap(graph: &BicoloredGraph) -> BicoloredSegment {
        BicoloredSegment {
            graph: graph.clone(),
            parent_map: graph.vertices().collect(),
            original_map: graph.vertices().collect(),
            attachments: Vec::new(),
            attachment_colors: vec![None; graph.vertex_count()],
            cycle_len: 0,
        }
    }

    pub fn graph(&self) -> &BicoloredGraph {
        &self.graph
    }

    /// The vertex of the parent segment behind a local one.
    pub fn parent_vertex(&self, local: VertexI) -> VertexI {
        self.parent_map[local.0]
    }

    /// The vertex of the root bicolored graph behind a local one.
    pub fn original_vertex(&self, local: VertexI) -> VertexI {
        self.original_map[local.0]
    }

    pub fn attachments(&self) -> &[VertexI] {
        &self.attachments
    }

    pub fn is_attachment(&self, local: VertexI) -> bool {
        self.attachment_colors[local.0].is_some()
    }

    pub fn attachment_color(&self, local: VertexI) -> Option<AttachmentColor> {
        self.attachment_colors[local.0]
    }

    /// Whether edges of `color` reach the cycle at this attachment (black
    /// attachments count for every color).
    pub fn is_attachment_of(&self, local: VertexI, color: Color) -> bool {
        match self.attachment_colors[local.0] {
            Some(tag) => tag.reaches(color),
            None => false,
        }
    }

    pub fn on_cycle(&self, local: VertexI) -> bool {
        local.0 < self.cycle_len
    }

    fn add_attachment(&mut self, local: VertexI, color: Color) {
        if self.attachment_colors[local.0] == Some(AttachmentColor::Black) {
            return;
        }
        if self.attachment_colors[local.0].is_none() {
            self.attachments.push(local);
        }
        let merged = match color {
            Color::Black => AttachmentColor::Black,
            Color::Red => {
                if self.is_attachment_of(local, Color::Blue) {
                    AttachmentColor::RedAndBlue
                } else {
                    AttachmentColor::Red
                }
            }
            Color::Blue => {
                if self.is_attachment_of(local, Color::Red) {
                    AttachmentColor::RedAndBlue
                } else {
                    AttachmentColor::Blue
                }
            }
        };
        self.attachment_colors[local.0] = Some(merged);
    }

    /// Counting edges of every color: attachments may carry up to three,
    /// anything else at most two. Single chords of any color pass too.
    pub fn is_path(&self) -> bool {
        for v in self.graph.vertices() {
            let limit = if self.is_attachment(v) { 3 } else { 2 };
            if self.graph.degree(v) > limit {
                return false;
            }
        }
        true
    }

    /// Counting only black edges: the black subgraph threads through the
    /// segment as a simple path (red or blue extras may still hang off
    /// it).
    pub fn is_black_path(&self) -> bool {
        for v in self.graph.vertices() {
            let limit = if self.is_attachment(v) { 3 } else { 2 };
            if self.graph.black_degree(v) > limit {
                return false;
            }
        }
        true
    }

    /// BFS over black edges between two attachments, never hopping
    /// directly from cycle vertex to cycle vertex. The result is spliced
    /// into the intersection cycle, so it must stay black.
    pub fn black_path_between_attachments(&self, start: VertexI, end: VertexI) -> Vec<VertexI> {
        if !self.is_attachment(start) || !self.is_attachment(end) {
            invalid_graph!();
        }
        let mut prev: Vec<Option<VertexI>> = vec![None; self.graph.vertex_count()];
        let mut queue = VecDeque::new();
        queue.push_back(start);
        'search: while let Some(v) = queue.pop_front() {
            for edge in self.graph.edges_of(v) {
                if edge.color != Color::Black {
                    continue;
                }
                let w = edge.to;
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

impl Debug for BicoloredSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.vertices() {
            write!(
                f,
                "node: {} neighbors: {} [",
                self.original_vertex(v).0,
                self.graph.degree(v)
            )?;
            for edge in self.graph.edges_of(v) {
                write!(
                    f,
                    " ({} {})",
                    self.original_vertex(edge.to).0,
                    edge.color.as_str()
                )?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

/// Enumerates the bicolored segments of the intersection cycle: bridges of
/// any color mix first, then chords, each chord colored by its single
/// edge.
pub fn segments_of(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
) -> Vec<BicoloredSegment> {
    let mut segments = Vec::new();
    find_bridges(parent, cycle, &mut segments);
    find_chords(parent, cycle, &mut segments);
    segments
}

fn find_bridges(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    segments: &mut Vec<BicoloredSegment>,
) {
    let mut visited: Vec<bool> = parent
        .graph()
        .vertices()
        .map(|v| cycle.contains(v))
        .collect();
    for v in parent.graph().vertices() {
        if !visited[v.0] {
            let mut nodes = Vec::new();
            let mut edges = Vec::new();
            collect_bridge(parent, cycle, v, &mut visited, &mut nodes, &mut edges);
            segments.push(build_bridge(parent, cycle, &nodes, &edges));
        }
    }
}

fn collect_bridge(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    v: VertexI,
    visited: &mut Vec<bool>,
    nodes: &mut Vec<VertexI>,
    edges: &mut Vec<(VertexI, VertexI, Color)>,
) {
    nodes.push(v);
    visited[v.0] = true;
    for edge in parent.graph().edges_of(v) {
        let w = edge.to;
        if cycle.contains(w) {
            edges.push((v, w, edge.color));
            continue;
        }
        if v.0 < w.0 {
            edges.push((v, w, edge.color));
        }
        if !visited[w.0] {
            collect_bridge(parent, cycle, w, visited, nodes, edges);
        }
    }
}

fn find_chords(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    segments: &mut Vec<BicoloredSegment>,
) {
    for position in 0..cycle.len() {
        let v = cycle.node_at(position);
        for edge in parent.graph().edges_of(v) {
            let w = edge.to;
            if v.0 < w.0 {
                continue;
            }
            if cycle.contains(w) && w != cycle.prev_of(v) && w != cycle.next_of(v) {
                segments.push(build_chord(parent, cycle, v, w, edge.color));
            }
        }
    }
}

fn copy_cycle_vertices(
    segment: &mut BicoloredSegment,
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
) {
    for position in 0..cycle.len() {
        let parent_local = cycle.node_at(position);
        segment.parent_map[position] = parent_local;
        segment.original_map[position] = parent.original_vertex(parent_local);
    }
}

fn add_cycle_edges(segment: &mut BicoloredSegment, cycle_len: usize) {
    for i in 0..cycle_len - 1 {
        segment
            .graph
            .add_edge(VertexI(i), VertexI(i + 1), Color::Black)
            .unwrap_or_else(|_| invalid_graph!());
    }
    segment
        .graph
        .add_edge(VertexI(0), VertexI(cycle_len - 1), Color::Black)
        .unwrap_or_else(|_| invalid_graph!());
}

fn build_bridge(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    nodes: &[VertexI],
    edges: &[(VertexI, VertexI, Color)],
) -> BicoloredSegment {
    let mut segment = BicoloredSegment::new(nodes.len() + cycle.len(), cycle.len());
    copy_cycle_vertices(&mut segment, parent, cycle);
    let mut local_of: Vec<Option<usize>> = vec![None; parent.graph().vertex_count()];
    for position in 0..cycle.len() {
        local_of[cycle.node_at(position).0] = Some(position);
    }
    for (i, &internal) in nodes.iter().enumerate() {
        let local = i + cycle.len();
        local_of[internal.0] = Some(local);
        segment.parent_map[local] = internal;
        segment.original_map[local] = parent.original_vertex(internal);
    }
    for &(u, v, color) in edges {
        let lu = VertexI(local_of[u.0].unwrap_or_else(|| invalid_graph!()));
        let lv = VertexI(local_of[v.0].unwrap_or_else(|| invalid_graph!()));
        segment
            .graph
            .add_edge(lu, lv, color)
            .unwrap_or_else(|_| invalid_graph!());
        if cycle.contains(u) {
            segment.add_attachment(lu, color);
        }
        if cycle.contains(v) {
            segment.add_attachment(lv, color);
        }
    }
    add_cycle_edges(&mut segment, cycle.len());
    segment
}

fn build_chord(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    a: VertexI,
    b: VertexI,
    color: Color,
) -> BicoloredSegment {
    let mut chord = BicoloredSegment::new(cycle.len(), cycle.len());
    copy_cycle_vertices(&mut chord, parent, cycle);
    add_cycle_edges(&mut chord, cycle.len());
    let pa = cycle.position_of(a).unwrap_or_else(|| invalid_graph!());
    let pb = cycle.position_of(b).unwrap_or_else(|| invalid_graph!());
    chord
        .graph
        .add_edge(VertexI(pa), VertexI(pb), color)
        .unwrap_or_else(|_| invalid_graph!());
    chord.add_attachment(VertexI(pa), color);
    chord.add_attachment(VertexI(pb), color);
    chord
}
