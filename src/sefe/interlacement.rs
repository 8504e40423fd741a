use crate::graph::{Graph, VertexI};

use super::bicolored::Color;
use super::cycle::IntersectionCycle;
use super::segment::BicoloredSegment;

/// The conflict graph of the bicolored segments of an intersection cycle.
/// Interlacement is tested once per color (red attachments against red,
/// blue against blue, black counting for both) and two segments conflict
/// as soon as either color does. A simultaneous embedding around this
/// cycle exists iff the combined graph is bipartite.
pub struct SefeInterlacementGraph {
    graph: Graph,
}

impl SefeInterlacementGraph {
    pub fn new(cycle: &IntersectionCycle, segments: &[BicoloredSegment]) -> SefeInterlacementGraph {
        let mut graph = Graph::new(segments.len());
        for i in 0..segments.len() {
            let (red_labels, red_count) = colored_cycle_labels(cycle, &segments[i], Color::Red);
            let (blue_labels, blue_count) = colored_cycle_labels(cycle, &segments[i], Color::Blue);
            for j in i + 1..segments.len() {
                let other = &segments[j];
                if conflicting(other, &red_labels, Color::Red, red_count)
                    || conflicting(other, &blue_labels, Color::Blue, blue_count)
                {
                    graph.push_arc(VertexI(i), VertexI(j));
                    graph.push_arc(VertexI(j), VertexI(i));
                }
            }
        }
        SefeInterlacementGraph { graph }
    }

    pub fn bipartition(&self) -> Option<Vec<u8>> {
        self.graph.bipartition()
    }
}

/// Even labels at the segment's attachments of the given color, odd labels
/// in the gaps, walking the cycle once; the monochromatic labeling
/// restricted to one color class.
fn colored_cycle_labels(
    cycle: &IntersectionCycle,
    segment: &BicoloredSegment,
    color: Color,
) -> (Vec<usize>, usize) {
    debug_assert!(color != Color::Black);
    let graph_size = cycle.graph_size();
    let mut is_attachment = vec![false; graph_size];
    let mut total = 0;
    for &a in segment.attachments() {
        if segment.is_attachment_of(a, color) {
            is_attachment[segment.parent_vertex(a).0] = true;
            total += 1;
        }
    }
    let mut labels = vec![0; graph_size];
    let mut found = 0;
    for position in 0..cycle.len() {
        let v = cycle.node_at(position);
        if is_attachment[v.0] {
            labels[v.0] = 2 * found;
            found += 1;
        } else if found == 0 {
            labels[v.0] = if total == 0 { 0 } else { 2 * total - 1 };
        } else {
            labels[v.0] = 2 * found - 1;
        }
    }
    debug_assert_eq!(found, total);
    (labels, total)
}

/// Sliding-window test against the labeled segment, restricted to one
/// color. A segment with no attachments of the color cannot conflict in
/// it.
fn conflicting(
    other: &BicoloredSegment,
    labels: &[usize],
    color: Color,
    attachments: usize,
) -> bool {
    if attachments == 0 {
        return false;
    }
    let number_of_labels = 2 * attachments;
    let mut hits = vec![0usize; number_of_labels];
    let mut other_attachments = 0;
    for &a in other.attachments() {
        if !other.is_attachment_of(a, color) {
            continue;
        }
        hits[labels[other.parent_vertex(a).0]] = 1;
        other_attachments += 1;
    }
    if other_attachments == 0 {
        return false;
    }
    let total: usize = hits.iter().sum();
    let mut window = hits[0] + hits[1 % number_of_labels] + hits[2 % number_of_labels];
    let mut k = 0;
    while k + 2 <= number_of_labels {
        if window == total {
            return false;
        }
        window += hits[(3 + k) % number_of_labels] + hits[(4 + k) % number_of_labels];
        window -= hits[k] + hits[(1 + k) % number_of_labels];
        k += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::sefe::bicolored::BicoloredGraph;
    use crate::sefe::segment::segments_of;

    fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n);
        for &(u, v) in edges {
            g.add_edge(VertexI(u), VertexI(v)).expect("test edge");
        }
        g
    }

    fn conflicts(red: &Graph, blue: &Graph) -> (usize, Option<Vec<u8>>) {
        let bicolored = BicoloredGraph::from_pair(red, blue).expect("same vertex set");
        let root = BicoloredSegment::wrap(&bicolored);
        let cycle = IntersectionCycle::new(&root);
        let segments = segments_of(&root, &cycle);
        let interlacement = SefeInterlacementGraph::new(&cycle, &segments);
        (segments.len(), interlacement.bipartition())
    }

    #[test]
    fn test_same_color_interlacing_chords_conflict() {
        // two interlacing red chords on a black square: red conflicts
        let red = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let blue = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let (count, sides) = conflicts(&red, &blue);
        assert_eq!(count, 2);
        let sides = sides.expect("two chords still two-color");
        assert_ne!(sides[0], sides[1]);
    }

    #[test]
    fn test_differently_colored_chords_do_not_conflict() {
        // one red and one blue diagonal interlace geometrically but live
        // in different drawings, so they may share a side
        let red = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
        let blue = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]);
        let (count, sides) = conflicts(&red, &blue);
        assert_eq!(count, 2);
        let sides = sides.expect("no conflict at all");
        assert_eq!(sides[0], sides[1]);
    }

    #[test]
    fn test_black_chords_conflict_in_both_colors() {
        let shared = graph_from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2), (1, 3)]);
        let (count, sides) = conflicts(&shared, &shared);
        assert_eq!(count, 2);
        let sides = sides.expect("two chords two-color");
        assert_ne!(sides[0], sides[1]);
    }

    #[test]
    fn test_three_red_interlacing_chords_fail() {
        let red = graph_from_edges(
            6,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 0),
                (0, 3),
                (1, 4),
                (2, 5),
            ],
        );
        let blue = graph_from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        let (count, sides) = conflicts(&red, &blue);
        assert_eq!(count, 3);
        assert!(sides.is_none());
    }
}
