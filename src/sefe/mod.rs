use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::embedder::bicomps::BiconnectedComponents;
use crate::embedder::Embedding;
use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::{Graph, VertexI};
use crate::invalid_graph;
use crate::util::iterators::cyclic::CyclicIterable;

use self::bicolored::{BicoloredGraph, Color, ColoredEdge};
use self::cycle::IntersectionCycle;
use self::interlacement::SefeInterlacementGraph;
use self::segment::{segments_of, BicoloredSegment};

pub mod bicolored;
pub mod cycle;
pub mod interlacement;
pub mod segment;

/// A simultaneous embedding: the bicolored graph with every vertex's edge
/// list in a cyclic order realizable by a planar drawing of the red-black
/// graph and one of the blue-black graph that coincide on the black edges.
pub struct EmbeddingSefe {
    graph: BicoloredGraph,
}

impl EmbeddingSefe {
    fn with_vertices(number_of_vertices: usize) -> EmbeddingSefe {
        EmbeddingSefe {
            graph: BicoloredGraph::new(number_of_vertices),
        }
    }

    fn add_half_edge(&mut self, from: VertexI, to: VertexI, color: Color) {
        self.graph.push_arc(from, to, color);
    }

    fn add_edge_pair(&mut self, u: VertexI, v: VertexI, color: Color) {
        self.graph.push_arc(u, v, color);
        self.graph.push_arc(v, u, color);
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// The cyclic order of colored edges around `v`.
    pub fn neighbors(&self, v: VertexI) -> &[ColoredEdge] {
        self.graph.edges_of(v)
    }

    /// The planar embedding of the first input graph: red and black edges
    /// in their cyclic order, blue projected out.
    pub fn red_view(&self) -> Embedding {
        self.view(Color::Red)
    }

    /// The planar embedding of the second input graph.
    pub fn blue_view(&self) -> Embedding {
        self.view(Color::Blue)
    }

    fn view(&self, keep: Color) -> Embedding {
        let mut embedding = Embedding::with_vertices(self.vertex_count());
        for v in self.graph.vertices() {
            for edge in self.graph.edges_of(v) {
                if edge.color == keep || edge.color == Color::Black {
                    embedding.add_half_edge(v, edge.to);
                }
            }
        }
        embedding
    }
}

impl Display for EmbeddingSefe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.vertices() {
            write!(f, "node: {} neighbors: {} [", v.0, self.graph.degree(v))?;
            for edge in self.graph.edges_of(v) {
                write!(f, " ({} {})", edge.to.0, edge.color.as_str())?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

/// Decides whether the two graphs admit planar embeddings agreeing on
/// their shared edges. Preconditions: one vertex set, and the shared
/// subgraph (ignoring vertices without shared edges) biconnected.
pub fn test_sefe(red: &Graph, blue: &Graph) -> GraphResult<bool> {
    let bicolored = BicoloredGraph::from_pair(red, blue)?;
    validate_intersection(&bicolored)?;
    if bicolored.vertex_count() < 4 {
        return Ok(true);
    }
    let root = BicoloredSegment::wrap(&bicolored);
    let mut cycle = IntersectionCycle::new(&root);
    Ok(test_on_cycle(&root, &mut cycle))
}

/// Produces a simultaneous embedding, or `Ok(None)` when the instance
/// admits none. Same preconditions as `test_sefe`.
pub fn embed(graph: &BicoloredGraph) -> GraphResult<Option<EmbeddingSefe>> {
    validate_intersection(graph)?;
    if graph.vertex_count() < 4 {
        return Ok(Some(trivial_embedding(graph)));
    }
    let root = BicoloredSegment::wrap(graph);
    let mut cycle = IntersectionCycle::new(&root);
    Ok(embed_on_cycle(&root, &mut cycle))
}

/// The shared subgraph must form a single biconnected block; vertices
/// carrying no shared edge at all are tolerated, they end up inside
/// segments.
fn validate_intersection(graph: &BicoloredGraph) -> GraphResult<()> {
    let bicomps = BiconnectedComponents::decompose(graph.intersection());
    let nontrivial = bicomps
        .components()
        .iter()
        .filter(|component| component.vertex_count() > 1)
        .count();
    if nontrivial != 1 || !bicomps.cut_vertices().is_empty() {
        return GraphErr::new_err("The shared subgraph of a SEFE instance must be biconnected");
    }
    Ok(())
}

fn trivial_embedding(graph: &BicoloredGraph) -> EmbeddingSefe {
    let mut embedding = EmbeddingSefe::with_vertices(graph.vertex_count());
    for u in graph.vertices() {
        for edge in graph.edges_of(u) {
            if u.0 < edge.to.0 {
                embedding.add_edge_pair(u, edge.to, edge.color);
            }
        }
    }
    embedding
}

fn test_on_cycle(parent: &BicoloredSegment, cycle: &mut IntersectionCycle) -> bool {
    let segments = segments_of(parent, cycle);
    if segments.is_empty() {
        return true;
    }
    if segments.len() == 1 {
        let segment = &segments[0];
        if segment.is_path() {
            return true;
        }
        make_cycle_good(cycle, segment);
        return test_on_cycle(parent, cycle);
    }
    let interlacement = SefeInterlacementGraph::new(cycle, &segments);
    if interlacement.bipartition().is_none() {
        return false;
    }
    for segment in &segments {
        let mut child_cycle = IntersectionCycle::new(segment);
        if !test_on_cycle(segment, &mut child_cycle) {
            return false;
        }
    }
    true
}

fn embed_on_cycle(
    parent: &BicoloredSegment,
    cycle: &mut IntersectionCycle,
) -> Option<EmbeddingSefe> {
    let segments = segments_of(parent, cycle);
    if segments.is_empty() {
        return Some(trivial_embedding(parent.graph()));
    }
    if segments.len() == 1 {
        let segment = &segments[0];
        if segment.is_path() {
            return Some(base_case_path(parent, cycle));
        }
        make_cycle_good(cycle, segment);
        return embed_on_cycle(parent, cycle);
    }
    let interlacement = SefeInterlacementGraph::new(cycle, &segments);
    let bipartition = interlacement.bipartition()?;
    let mut embeddings = Vec::with_capacity(segments.len());
    for segment in &segments {
        let mut child_cycle = IntersectionCycle::new(segment);
        embeddings.push(embed_on_cycle(segment, &mut child_cycle)?);
    }
    Some(merge_segment_embeddings(
        parent,
        cycle,
        &segments,
        &embeddings,
        &bipartition,
    ))
}

/// Base case: the cycle plus one path-like segment (or a single chord of
/// any color). At a degree-3 attachment the order is (next on cycle, into
/// the segment, prev on cycle).
fn base_case_path(parent: &BicoloredSegment, cycle: &IntersectionCycle) -> EmbeddingSefe {
    let graph = parent.graph();
    let mut embedding = EmbeddingSefe::with_vertices(graph.vertex_count());
    for v in graph.vertices() {
        let edges = graph.edges_of(v);
        match edges.len() {
            2 => {
                embedding.add_half_edge(v, edges[0].to, edges[0].color);
                embedding.add_half_edge(v, edges[1].to, edges[1].color);
            }
            3 => {
                let mut order: [Option<ColoredEdge>; 3] = [None; 3];
                for edge in edges {
                    if cycle.next_of(v) == edge.to {
                        order[0] = Some(*edge);
                    } else if cycle.prev_of(v) == edge.to {
                        order[2] = Some(*edge);
                    } else {
                        order[1] = Some(*edge);
                    }
                }
                for slot in order.iter() {
                    match slot {
                        Some(edge) => embedding.add_half_edge(v, edge.to, edge.color),
                        None => invalid_graph!(),
                    }
                }
            }
            _ => invalid_graph!(),
        }
    }
    embedding
}

/// Cycle rotation for the bicolored recursion: only black attachments can
/// anchor the substituted path (the intersection cycle must stay black),
/// and a leftover attachment, black or not, is kept on the new cycle so
/// the next round still sees the full attachment spread.
fn make_cycle_good(cycle: &mut IntersectionCycle, segment: &BicoloredSegment) {
    debug_assert!(!segment.is_path());
    let mut attachment_at = vec![false; cycle.len()];
    for &a in segment.attachments() {
        let position = cycle
            .position_of(segment.parent_vertex(a))
            .unwrap_or_else(|| invalid_graph!());
        attachment_at[position] = true;
    }
    let mut to_use: Vec<VertexI> = Vec::new();
    let mut to_include: Option<VertexI> = None;
    for position in 0..cycle.len() {
        if !attachment_at[position] {
            continue;
        }
        let local = VertexI(position);
        if !segment.is_attachment_of(local, Color::Black) {
            to_include = Some(local);
            continue;
        }
        if to_use.len() < 2 {
            to_use.push(local);
        } else {
            to_include = Some(local);
        }
        if to_use.len() == 2 && to_include.is_some() {
            break;
        }
    }
    if to_use.len() < 2 {
        invalid_graph!();
    }
    let path = segment.black_path_between_attachments(to_use[0], to_use[1]);
    let path_in_parent = path
        .iter()
        .map(|&v| segment.parent_vertex(v))
        .collect_vec();
    let include_in_parent = to_include.map(|v| segment.parent_vertex(v));
    cycle.change_with_path(&path_in_parent, include_in_parent);
}

/// Attachment extrema of one segment, as cycle positions: per color (black
/// counts for both; a segment without attachments of a color falls back to
/// its overall extrema) and overall.
struct ColoredExtrema {
    min: usize,
    max: usize,
    red_min: usize,
    red_max: usize,
    blue_min: usize,
    blue_max: usize,
}

fn attachment_extrema(segments: &[BicoloredSegment]) -> Vec<ColoredExtrema> {
    segments
        .iter()
        .map(|segment| {
            let overall = extent(segment.attachments().iter().map(|a| a.0));
            let (min, max) = match overall {
                Some(extrema) => extrema,
                None => invalid_graph!(),
            };
            let red = extent(
                segment
                    .attachments()
                    .iter()
                    .filter(|&&a| segment.is_attachment_of(a, Color::Red))
                    .map(|a| a.0),
            )
            .unwrap_or((min, max));
            let blue = extent(
                segment
                    .attachments()
                    .iter()
                    .filter(|&&a| segment.is_attachment_of(a, Color::Blue))
                    .map(|a| a.0),
            )
            .unwrap_or((min, max));
            ColoredExtrema {
                min,
                max,
                red_min: red.0,
                red_max: red.1,
                blue_min: blue.0,
                blue_max: blue.1,
            }
        })
        .collect_vec()
}

fn extent<I: Iterator<Item = usize>>(positions: I) -> Option<(usize, usize)> {
    positions.minmax().into_option()
}

/// Same handedness probe as the monochromatic merge, over colored rings.
fn embedding_compatibilities(
    cycle: &IntersectionCycle,
    segments: &[BicoloredSegment],
    embeddings: &[EmbeddingSefe],
) -> Vec<bool> {
    segments
        .iter()
        .zip(embeddings)
        .map(|(segment, embedding)| {
            let attachment = segment.attachments()[0];
            let on_parent = segment.parent_vertex(attachment);
            let next = cycle.next_of(on_parent);
            let prev = cycle.prev_of(on_parent);
            let ring = embedding.neighbors(attachment);
            debug_assert!(ring.len() >= 3);
            let position = ring
                .iter()
                .position(|edge| segment.parent_vertex(edge.to) == next)
                .unwrap_or_else(|| invalid_graph!());
            let following = ring
                .cycle_from(position)
                .nth(1)
                .unwrap_or_else(|| invalid_graph!());
            segment.parent_vertex(following.to) != prev
        })
        .collect_vec()
}

fn add_middle_edges(
    segment: &BicoloredSegment,
    embedding: &EmbeddingSefe,
    position: usize,
    cycle: &IntersectionCycle,
    handedness: bool,
    output: &mut EmbeddingSefe,
) {
    let cycle_node = cycle.node_at(position);
    let prev = cycle.prev_of(cycle_node);
    let next = cycle.next_of(cycle_node);
    let local = VertexI(position);
    debug_assert!(segment.is_attachment(local));
    let ring = embedding.neighbors(local);
    let anchor = ring
        .iter()
        .position(|edge| {
            let on_parent = segment.parent_vertex(edge.to);
            on_parent == prev || on_parent == next
        })
        .unwrap_or_else(|| invalid_graph!());
    let mut to_add = Vec::new();
    for edge in ring.cycle_from(anchor).skip(1) {
        let on_parent = segment.parent_vertex(edge.to);
        if on_parent == prev || on_parent == next {
            continue;
        }
        to_add.push((on_parent, edge.color));
    }
    if handedness {
        for (w, color) in to_add {
            output.add_half_edge(cycle_node, w, color);
        }
    } else {
        for (w, color) in to_add.into_iter().rev() {
            output.add_half_edge(cycle_node, w, color);
        }
    }
}

/// Side-order around a cycle vertex, colored: segments are compared by
/// their red extrema first, their blue extrema second (black attachments
/// weigh in on both), attachment count next, and the original index last,
/// ascending among segments opening here and descending among those
/// closing here.
fn segment_order(
    incident: &[usize],
    position: usize,
    extrema: &[ColoredExtrema],
    segments: &[BicoloredSegment],
) -> Vec<usize> {
    let mut min_segments = Vec::new();
    let mut max_segments = Vec::new();
    let mut middle = None;
    for &i in incident {
        if extrema[i].min == position {
            min_segments.push(i);
        } else if extrema[i].max == position {
            max_segments.push(i);
        } else {
            debug_assert!(middle.is_none());
            middle = Some(i);
        }
    }
    max_segments.sort_by(|&a, &b| {
        extrema[b]
            .red_min
            .cmp(&extrema[a].red_min)
            .then(extrema[b].blue_min.cmp(&extrema[a].blue_min))
            .then(segments[b].attachments().len().cmp(&segments[a].attachments().len()))
            .then(b.cmp(&a))
    });
    min_segments.sort_by(|&a, &b| {
        extrema[b]
            .red_max
            .cmp(&extrema[a].red_max)
            .then(extrema[b].blue_max.cmp(&extrema[a].blue_max))
            .then(segments[b].attachments().len().cmp(&segments[a].attachments().len()))
            .then(a.cmp(&b))
    });
    max_segments
        .into_iter()
        .chain(middle)
        .chain(min_segments)
        .collect_vec()
}

/// The monochromatic merge lifted to colors: cycle edges are emitted
/// black, every other edge keeps the color it carries in its segment.
fn merge_segment_embeddings(
    parent: &BicoloredSegment,
    cycle: &IntersectionCycle,
    segments: &[BicoloredSegment],
    embeddings: &[EmbeddingSefe],
    bipartition: &[u8],
) -> EmbeddingSefe {
    let mut output = EmbeddingSefe::with_vertices(parent.graph().vertex_count());
    let extrema = attachment_extrema(segments);
    let compatible = embedding_compatibilities(cycle, segments, embeddings);
    let handedness = (0..segments.len())
        .map(|i| {
            if bipartition[i] == 0 {
                compatible[i]
            } else {
                !compatible[i]
            }
        })
        .collect_vec();
    for position in 0..cycle.len() {
        let mut inside = Vec::new();
        let mut outside = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if segment.is_attachment(VertexI(position)) {
                if bipartition[i] == 0 {
                    inside.push(i);
                } else {
                    outside.push(i);
                }
            }
        }
        let cycle_node = cycle.node_at(position);
        let inside_order = segment_order(&inside, position, &extrema, segments)
            .into_iter()
            .rev()
            .collect_vec();
        let outside_order = segment_order(&outside, position, &extrema, segments);
        output.add_half_edge(cycle_node, cycle.next_of(cycle_node), Color::Black);
        for &i in &inside_order {
            add_middle_edges(
                &segments[i],
                &embeddings[i],
                position,
                cycle,
                handedness[i],
                &mut output,
            );
        }
        output.add_half_edge(cycle_node, cycle.prev_of(cycle_node), Color::Black);
        for &i in &outside_order {
            add_middle_edges(
                &segments[i],
                &embeddings[i],
                position,
                cycle,
                handedness[i],
                &mut output,
            );
        }
    }
    for (i, segment) in segments.iter().enumerate() {
        for local in segment.graph().vertices() {
            if segment.on_cycle(local) {
                continue;
            }
            let on_parent = segment.parent_vertex(local);
            let ring = embeddings[i]
                .neighbors(local)
                .iter()
                .map(|edge| (segment.parent_vertex(edge.to), edge.color))
                .collect_vec();
            if handedness[i] {
                for (w, color) in ring {
                    output.add_half_edge(on_parent, w, color);
                }
            } else {
                for (w, color) in ring.into_iter().rev() {
                    output.add_half_edge(on_parent, w, color);
                }
            }
        }
    }
    output
}
