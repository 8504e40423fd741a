use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::graph::error::{GraphErr, GraphResult};
use crate::graph::{Graph, VertexI};
use crate::invalid_graph;
use crate::util::iterators::cyclic::CyclicIterable;

use self::bicomps::BiconnectedComponents;
use self::cycle::Cycle;
use self::interlacement::InterlacementGraph;
use self::segment::{segments_of, Segment};

pub mod bicomps;
pub mod cycle;
pub mod interlacement;
pub mod segment;

/// A combinatorial embedding: structurally the input graph, but with every
/// vertex's neighbor list holding the cyclic order of its incident edges
/// in a planar drawing.
pub struct Embedding {
    graph: Graph,
}

impl Embedding {
    pub(crate) fn with_vertices(number_of_vertices: usize) -> Embedding {
        Embedding {
            graph: Graph::new(number_of_vertices),
        }
    }

    /// Appends `to` to the cyclic order around `from`. The twin half-edge
    /// is emitted separately when its own position in the order around `to`
    /// is reached.
    pub(crate) fn add_half_edge(&mut self, from: VertexI, to: VertexI) {
        self.graph.push_arc(from, to);
    }

    fn add_edge_pair(&mut self, u: VertexI, v: VertexI) {
        self.graph.push_arc(u, v);
        self.graph.push_arc(v, u);
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The cyclic order of neighbors around `v`.
    pub fn neighbors(&self, v: VertexI) -> &[VertexI] {
        self.graph.neighbors(v)
    }

    /// The embedding seen as a plain graph (dropping the meaning of the
    /// neighbor order).
    pub fn as_graph(&self) -> &Graph {
        &self.graph
    }

    /// Traces the faces of the embedding. Every directed edge lies on
    /// exactly one face; from `(u, v)` the walk continues with the neighbor
    /// preceding `u` in the cyclic order around `v`. For a connected planar
    /// embedding the count obeys Euler's formula |F| = |E| - |V| + 2.
    pub fn faces(&self) -> Vec<Vec<(VertexI, VertexI)>> {
        let mut visited: HashSet<(VertexI, VertexI)> = HashSet::new();
        let mut faces = Vec::new();
        for u in self.graph.vertices() {
            for &v in self.graph.neighbors(u) {
                if visited.contains(&(u, v)) {
                    continue;
                }
                let mut face = Vec::new();
                let (mut a, mut b) = (u, v);
                loop {
                    face.push((a, b));
                    visited.insert((a, b));
                    let ring = self.graph.neighbors(b);
                    let position = ring
                        .iter()
                        .position(|&w| w == a)
                        .unwrap_or_else(|| invalid_graph!());
                    let succ = ring[(position + ring.len() - 1) % ring.len()];
                    a = b;
                    b = succ;
                    if (a, b) == (u, v) {
                        break;
                    }
                }
                faces.push(face);
            }
        }
        faces
    }
}

impl Display for Embedding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for v in self.graph.vertices() {
            write!(f, "node: {} neighbors: {} [", v.0, self.graph.degree(v))?;
            for w in self.graph.neighbors(v) {
                write!(f, " {}", w.0)?;
            }
            writeln!(f, " ]")?;
        }
        Ok(())
    }
}

/// Embeds a connected simple graph in the plane, or returns `Ok(None)` if
/// it is not planar. Disconnected input is an error, not a non-planarity
/// verdict.
pub fn embed(graph: &Graph) -> GraphResult<Option<Embedding>> {
    if !graph.is_connected() {
        return GraphErr::new_err("Cannot embed a disconnected graph");
    }
    if graph.vertex_count() < 4 {
        return Ok(Some(trivial_embedding(graph)));
    }
    if graph.edge_count() > 3 * graph.vertex_count() - 6 {
        return Ok(None);
    }
    let bicomps = BiconnectedComponents::decompose(graph);
    let mut embeddings = Vec::with_capacity(bicomps.components().len());
    for component in bicomps.components() {
        match embed_component(component.graph()) {
            Some(embedding) => embeddings.push(embedding),
            None => return Ok(None),
        }
    }
    Ok(Some(merge_biconnected_components(
        graph,
        &bicomps,
        &embeddings,
    )))
}

/// Every graph on fewer than four vertices is planar in any neighbor
/// order; the same applies to components too small to contain a cycle.
fn trivial_embedding(graph: &Graph) -> Embedding {
    let mut embedding = Embedding::with_vertices(graph.vertex_count());
    for u in graph.vertices() {
        for &v in graph.neighbors(u) {
            if u.0 < v.0 {
                embedding.add_edge_pair(u, v);
            }
        }
    }
    embedding
}

fn embed_component(component: &Graph) -> Option<Embedding> {
    if component.vertex_count() < 3 {
        return Some(trivial_embedding(component));
    }
    let mut cycle = Cycle::new(component);
    embed_component_on_cycle(component, &mut cycle)
}

fn embed_component_on_cycle(component: &Graph, cycle: &mut Cycle) -> Option<Embedding> {
    let segments = segments_of(component, cycle);
    if segments.is_empty() {
        // the whole component is the cycle
        return Some(trivial_embedding(component));
    }
    if segments.len() == 1 {
        let segment = &segments[0];
        if segment.is_path() {
            return Some(base_case_path(component, cycle));
        }
        // the chosen cycle does not separate; enlarge it and retry
        make_cycle_good(cycle, segment);
        return embed_component_on_cycle(component, cycle);
    }
    let interlacement = InterlacementGraph::new(cycle, &segments);
    let bipartition = interlacement.bipartition()?;
    let mut embeddings = Vec::with_capacity(segments.len());
    for segment in &segments {
        embeddings.push(embed_component(segment.graph())?);
    }
    Some(merge_segment_embeddings(
        component,
        cycle,
        &segments,
        &embeddings,
        &bipartition,
    ))
}

/// Base case: the component is the cycle plus one path-segment. The path
/// is laid out as an arc on one side; at its two attachments the neighbor
/// order is (next on cycle, into the path, prev on cycle).
fn base_case_path(component: &Graph, cycle: &Cycle) -> Embedding {
    let mut embedding = Embedding::with_vertices(component.vertex_count());
    for v in component.vertices() {
        let neighbors = component.neighbors(v);
        match neighbors.len() {
            2 => {
                embedding.add_half_edge(v, neighbors[0]);
                embedding.add_half_edge(v, neighbors[1]);
            }
            3 => {
                let mut order = [None; 3];
                for &w in neighbors {
                    if cycle.next_of(v) == w {
                        order[0] = Some(w);
                    } else if cycle.prev_of(v) == w {
                        order[2] = Some(w);
                    } else {
                        order[1] = Some(w);
                    }
                }
                for slot in order.iter() {
                    match slot {
                        Some(w) => embedding.add_half_edge(v, *w),
                        None => invalid_graph!(),
                    }
                }
            }
            _ => invalid_graph!(),
        }
    }
    embedding
}

/// A cycle inducing a single non-path segment cannot drive the recursion;
/// substitute a path of the segment for one cycle arc, which moves interior
/// vertices onto the cycle and eventually separates the component into at
/// least two segments. A third attachment, if any, is kept on the new cycle
/// so the next round still sees it.
fn make_cycle_good(cycle: &mut Cycle, segment: &Segment) {
    debug_assert!(!segment.is_path());
    let mut attachment_at = vec![false; cycle.len()];
    for &a in segment.attachments() {
        let position = cycle
            .position_of(segment.component_vertex(a))
            .unwrap_or_else(|| invalid_graph!());
        attachment_at[position] = true;
    }
    let mut to_use: Vec<VertexI> = Vec::new();
    let mut to_include: Option<VertexI> = None;
    for position in 0..cycle.len() {
        if !attachment_at[position] {
            continue;
        }
        // segment-local index i < cycle.len() is the cycle vertex at i
        let local = VertexI(position);
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
    let path = segment.path_between_attachments(to_use[0], to_use[1]);
    let path_in_component = path
        .iter()
        .map(|&v| segment.component_vertex(v))
        .collect_vec();
    let include_in_component = to_include.map(|v| segment.component_vertex(v));
    cycle.change_with_path(&path_in_component, include_in_component);
}

/// Minimum and maximum attachment position on the cycle, per segment.
/// Attachment locals below the cycle length double as cycle positions.
fn attachment_extrema(segments: &[Segment]) -> (Vec<usize>, Vec<usize>) {
    let mut minima = Vec::with_capacity(segments.len());
    let mut maxima = Vec::with_capacity(segments.len());
    for segment in segments {
        let positions = segment.attachments().iter().map(|a| a.0);
        let (min, max) = match positions.minmax().into_option() {
            Some(extrema) => extrema,
            None => invalid_graph!(),
        };
        minima.push(min);
        maxima.push(max);
    }
    (minima, maxima)
}

/// A segment embedding is *compatible* when, with the cycle drawn
/// clockwise, it places the segment inside. Detected at any attachment:
/// the embedding is compatible iff the neighbor following `next(a)` in its
/// cyclic order is not `prev(a)`.
fn embedding_compatibilities(
    cycle: &Cycle,
    segments: &[Segment],
    embeddings: &[Embedding],
) -> Vec<bool> {
    segments
        .iter()
        .zip(embeddings)
        .map(|(segment, embedding)| {
            let attachment = segment.attachments()[0];
            let on_component = segment.component_vertex(attachment);
            let next = cycle.next_of(on_component);
            let prev = cycle.prev_of(on_component);
            let ring = embedding.neighbors(attachment);
            debug_assert!(ring.len() >= 3);
            let position = ring
                .iter()
                .position(|&w| segment.component_vertex(w) == next)
                .unwrap_or_else(|| invalid_graph!());
            let following = ring
                .cycle_from(position)
                .nth(1)
                .unwrap_or_else(|| invalid_graph!());
            segment.component_vertex(*following) != prev
        })
        .collect_vec()
}

/// Emits the non-cycle neighbors of the cycle vertex at `position` into the
/// output, in the order taken from the segment embedding (anchored right
/// after the cycle edge entry), forward or reversed per `handedness`.
fn add_middle_edges(
    segment: &Segment,
    embedding: &Embedding,
    position: usize,
    cycle: &Cycle,
    handedness: bool,
    output: &mut Embedding,
) {
    let cycle_node = cycle.node_at(position);
    let prev = cycle.prev_of(cycle_node);
    let next = cycle.next_of(cycle_node);
    let local = VertexI(position);
    debug_assert!(segment.is_attachment(local));
    let ring = embedding.neighbors(local);
    let anchor = ring
        .iter()
        .position(|&w| {
            let on_component = segment.component_vertex(w);
            on_component == prev || on_component == next
        })
        .unwrap_or_else(|| invalid_graph!());
    let mut to_add = Vec::new();
    for &w in ring.cycle_from(anchor).skip(1) {
        let on_component = segment.component_vertex(w);
        if on_component == prev || on_component == next {
            continue;
        }
        to_add.push(on_component);
    }
    if handedness {
        for w in to_add {
            output.add_half_edge(cycle_node, w);
        }
    } else {
        for w in to_add.into_iter().rev() {
            output.add_half_edge(cycle_node, w);
        }
    }
}

/// Orders the segments drawn on one side and incident to the cycle vertex
/// at `position`, outgoing clockwise: segments closing here first (the
/// further back their minimum reaches, the earlier), then the one spanning
/// across, then the segments opening here (the further their maximum
/// reaches, the earlier). Segments sharing an extremum nest by attachment
/// count, then by index.
fn segment_order(
    incident: &[usize],
    position: usize,
    minima: &[usize],
    maxima: &[usize],
    segments: &[Segment],
) -> Vec<usize> {
    let mut min_segments = Vec::new();
    let mut max_segments = Vec::new();
    let mut middle = None;
    for &i in incident {
        if minima[i] == position {
            min_segments.push(i);
        } else if maxima[i] == position {
            max_segments.push(i);
        } else {
            debug_assert!(middle.is_none());
            middle = Some(i);
        }
    }
    max_segments.sort_by(|&a, &b| {
        minima[b]
            .cmp(&minima[a])
            .then(segments[b].attachments().len().cmp(&segments[a].attachments().len()))
            .then(b.cmp(&a))
    });
    min_segments.sort_by(|&a, &b| {
        maxima[b]
            .cmp(&maxima[a])
            .then(segments[b].attachments().len().cmp(&segments[a].attachments().len()))
            .then(a.cmp(&b))
    });
    max_segments
        .into_iter()
        .chain(middle)
        .chain(min_segments)
        .collect_vec()
}

/// Weaves the per-segment embeddings into one embedding of the component.
/// Around every cycle vertex the output order is: the clockwise cycle
/// edge, the inside segments (in reverse side-order, since inside is drawn
/// with opposite handedness), the counter-clockwise cycle edge, the
/// outside segments. Interior segment vertices copy their ring as-is or
/// reversed depending on the segment's effective handedness.
fn merge_segment_embeddings(
    component: &Graph,
    cycle: &Cycle,
    segments: &[Segment],
    embeddings: &[Embedding],
    bipartition: &[u8],
) -> Embedding {
    let mut output = Embedding::with_vertices(component.vertex_count());
    let (minima, maxima) = attachment_extrema(segments);
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
        let inside_order = segment_order(&inside, position, &minima, &maxima, segments)
            .into_iter()
            .rev()
            .collect_vec();
        let outside_order = segment_order(&outside, position, &minima, &maxima, segments);
        output.add_half_edge(cycle_node, cycle.next_of(cycle_node));
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
        output.add_half_edge(cycle_node, cycle.prev_of(cycle_node));
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
    // interior vertices keep their segment ring wholesale
    for (i, segment) in segments.iter().enumerate() {
        for local in segment.graph().vertices() {
            if segment.on_cycle(local) {
                continue;
            }
            let on_component = segment.component_vertex(local);
            let ring = embeddings[i]
                .neighbors(local)
                .iter()
                .map(|&w| segment.component_vertex(w))
                .collect_vec();
            if handedness[i] {
                for w in ring {
                    output.add_half_edge(on_component, w);
                }
            } else {
                for w in ring.into_iter().rev() {
                    output.add_half_edge(on_component, w);
                }
            }
        }
    }
    output
}

/// Overlays the per-component embeddings on the original vertex indices. A
/// cut vertex receives the concatenation of its per-component orders; any
/// interleaving is planar since the components only share that vertex.
fn merge_biconnected_components(
    graph: &Graph,
    bicomps: &BiconnectedComponents,
    embeddings: &[Embedding],
) -> Embedding {
    let mut output = Embedding::with_vertices(graph.vertex_count());
    debug_assert_eq!(bicomps.components().len(), embeddings.len());
    for (component, embedding) in bicomps.components().iter().zip(embeddings) {
        for local in component.graph().vertices() {
            let original = component.original(local);
            for &w in embedding.neighbors(local) {
                output.add_half_edge(original, component.original(w));
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::Rng;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(VertexI(u), VertexI(v)).expect("test edge");
        }
        g
    }

    fn complete_graph(n: usize) -> Graph {
        let mut g = Graph::new(n);
        for u in 0..n {
            for v in u + 1..n {
                g.add_edge(VertexI(u), VertexI(v)).expect("test edge");
            }
        }
        g
    }

    /// Checks that the embedding re-emits every input edge exactly once in
    /// each direction and nothing else.
    fn assert_same_edges(graph: &Graph, embedding: &Embedding) {
        assert_eq!(graph.vertex_count(), embedding.vertex_count());
        for v in graph.vertices() {
            let expected = graph.neighbors(v).iter().map(|w| w.0).sorted().collect_vec();
            let actual = embedding
                .neighbors(v)
                .iter()
                .map(|w| w.0)
                .sorted()
                .collect_vec();
            assert_eq!(expected, actual, "neighbor multiset differs at {}", v);
        }
    }

    fn assert_euler(graph: &Graph, embedding: &Embedding) {
        let faces = embedding.faces();
        let expected = graph.edge_count() + 2 - graph.vertex_count();
        assert_eq!(faces.len(), expected);
        let traced: usize = faces.iter().map(|f| f.len()).sum();
        assert_eq!(traced, 2 * graph.edge_count());
    }

    #[test]
    fn test_triangle() {
        let g = graph_from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let embedding = embed(&g).expect("valid input").expect("planar");
        let nbs = embedding
            .neighbors(VertexI(0))
            .iter()
            .map(|w| w.0)
            .sorted()
            .collect_vec();
        assert_eq!(nbs, vec![1, 2]);
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
        assert_eq!(embedding.faces().len(), 2);
    }

    #[test]
    fn test_k4() {
        let g = complete_graph(4);
        let embedding = embed(&g).expect("valid input").expect("K4 is planar");
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
        assert_eq!(embedding.faces().len(), 4);
    }

    #[test]
    fn test_k5_is_not_planar() {
        let g = complete_graph(5);
        assert!(embed(&g).expect("valid input").is_none());
    }

    #[test]
    fn test_k33_is_not_planar() {
        let g = graph_from_edges(
            6,
            &[
                (0, 3),
                (0, 4),
                (0, 5),
                (1, 3),
                (1, 4),
                (1, 5),
                (2, 3),
                (2, 4),
                (2, 5),
            ],
        );
        assert!(embed(&g).expect("valid input").is_none());
    }

    #[test]
    fn test_theta_graph() {
        let g = graph_from_edges(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 3)],
        );
        let embedding = embed(&g).expect("valid input").expect("planar");
        assert_same_edges(&g, &embedding);
        assert_eq!(embedding.faces().len(), 3);
    }

    #[test]
    fn test_square_with_crossing_chords_is_k4() {
        let g = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let embedding = embed(&g).expect("valid input").expect("planar");
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
    }

    #[test]
    fn test_cut_vertices_merge() {
        // two triangles and a pending path, all glued at cut vertices
        let g = graph_from_edges(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 0),
                (2, 3),
                (3, 4),
                (4, 2),
                (4, 5),
                (5, 6),
                (6, 7),
            ],
        );
        let embedding = embed(&g).expect("valid input").expect("planar");
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
    }

    #[test]
    fn test_crossing_interior_paths() {
        // hexagon with two interlacing two-edge paths through interior
        // vertices; one path ends up outside with its interior vertex, the
        // case where segment handedness matters
        let g = graph_from_edges(
            8,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 0),
                (0, 6),
                (3, 6),
                (1, 7),
                (4, 7),
            ],
        );
        let embedding = embed(&g).expect("valid input").expect("planar");
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
        assert_eq!(embedding.faces().len(), 4);
    }

    #[test]
    fn test_disconnected_input_is_rejected() {
        let g = graph_from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
        assert!(embed(&g).is_err());
    }

    #[test]
    fn test_octahedron() {
        // 4-regular planar triangulation on 6 vertices
        let g = graph_from_edges(
            6,
            &[
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 1),
                (5, 1),
                (5, 2),
                (5, 3),
                (5, 4),
            ],
        );
        let embedding = embed(&g).expect("valid input").expect("planar");
        assert_same_edges(&g, &embedding);
        assert_euler(&g, &embedding);
        assert_eq!(embedding.faces().len(), 8);
    }

    /// Random stacked triangulation: start from a triangle and repeatedly
    /// place a new vertex inside a random face, joined to its three
    /// corners. Always maximal planar.
    fn random_triangulation<R: Rng>(rng: &mut R, n: usize) -> Graph {
        assert!(n >= 3);
        let mut g = Graph::new(n);
        g.add_edge(VertexI(0), VertexI(1)).expect("seed");
        g.add_edge(VertexI(1), VertexI(2)).expect("seed");
        g.add_edge(VertexI(0), VertexI(2)).expect("seed");
        let mut faces = vec![[0, 1, 2], [0, 1, 2]];
        for v in 3..n {
            let chosen = rng.gen_range(0..faces.len());
            let [a, b, c] = faces.swap_remove(chosen);
            for &corner in &[a, b, c] {
                g.add_edge(VertexI(v), VertexI(corner)).expect("stacking");
            }
            faces.push([a, b, v]);
            faces.push([a, c, v]);
            faces.push([b, c, v]);
        }
        g
    }

    #[test]
    fn test_random_triangulations_embed_and_round_trip() {
        let mut rng = rand::thread_rng();
        for n in &[3, 4, 6, 9, 14, 20, 28] {
            let g = random_triangulation(&mut rng, *n);
            assert_eq!(g.edge_count(), 3 * n - 6);
            let embedding = embed(&g)
                .expect("valid input")
                .expect("triangulations are planar");
            assert_same_edges(&g, &embedding);
            assert_euler(&g, &embedding);
            assert_eq!(embedding.faces().len(), 2 * n - 4);
        }
    }

    #[test]
    fn test_triangulation_plus_any_edge_is_not_planar() {
        let mut rng = rand::thread_rng();
        let g = random_triangulation(&mut rng, 12);
        // a maximal planar graph has no room for another edge
        let mut tight = g.clone();
        let missing = tight
            .vertices()
            .find_map(|u| {
                tight
                    .vertices()
                    .find(|&v| u != v && !tight.has_edge(u, v))
                    .map(|v| (u, v))
            });
        if let Some((u, v)) = missing {
            tight.add_edge(u, v).expect("still simple");
            assert!(embed(&tight).expect("valid input").is_none());
        }
    }
}
