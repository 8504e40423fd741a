use crate::graph::{Graph, VertexI};

use super::cycle::Cycle;
use super::segment::Segment;

/// The conflict graph of the segments of a fixed cycle: one node per
/// segment, one edge per pair that cannot share a side of the cycle
/// without crossing. The component is planar around this cycle iff the
/// interlacement graph is bipartite, and the bipartition names the sides.
pub struct InterlacementGraph {
    graph: Graph,
}

impl InterlacementGraph {
    pub fn new(cycle: &Cycle, segments: &[Segment]) -> InterlacementGraph {
        let mut graph = Graph::new(segments.len());
        for i in 0..segments.len() {
            let labels = cycle_labels(cycle, &segments[i]);
            let number_of_labels = 2 * segments[i].attachments().len();
            for j in i + 1..segments.len() {
                if conflicting(cycle, &segments[j], &labels, number_of_labels) {
                    graph.push_arc(VertexI(i), VertexI(j));
                    graph.push_arc(VertexI(j), VertexI(i));
                }
            }
        }
        InterlacementGraph { graph }
    }

    /// The side assignment (0 = inside, 1 = outside), or `None` when the
    /// conflicts are not two-colorable and the component is non-planar.
    pub fn bipartition(&self) -> Option<Vec<u8>> {
        self.graph.bipartition()
    }
}

/// Labels every component vertex by its place relative to the segment's
/// attachments: walking the cycle once, the k-th attachment encountered
/// gets the even label `2k`, the gaps between consecutive attachments get
/// the odd labels in between (the gap before the first attachment wraps
/// around to the last).
fn cycle_labels(cycle: &Cycle, segment: &Segment) -> Vec<usize> {
    let component_size = cycle.component_size();
    let mut is_attachment = vec![false; component_size];
    for &a in segment.attachments() {
        is_attachment[segment.component_vertex(a).0] = true;
    }
    let total = segment.attachments().len();
    let mut labels = vec![0; component_size];
    let mut found = 0;
    for position in 0..cycle.len() {
        let v = cycle.node_at(position);
        if is_attachment[v.0] {
            labels[v.0] = 2 * found;
            found += 1;
        } else if found == 0 {
            labels[v.0] = 2 * total - 1;
        } else {
            labels[v.0] = 2 * found - 1;
        }
    }
    debug_assert_eq!(found, total);
    labels
}

/// Sliding-window test: the other segment does not conflict iff all of its
/// attachments fit into one closed arc between two consecutive attachments
/// of the labeled segment. The window of three consecutive labels
/// (attachment, gap, attachment) slides by one attachment at a time.
fn conflicting(
    cycle: &Cycle,
    other: &Segment,
    labels: &[usize],
    number_of_labels: usize,
) -> bool {
    let mut hits = vec![0usize; number_of_labels];
    for &a in other.attachments() {
        let component_vertex = other.component_vertex(a);
        debug_assert!(cycle.contains(component_vertex));
        hits[labels[component_vertex.0]] = 1;
    }
    let total: usize = hits.iter().sum();
    let mut window = hits[0] + hits[1] + hits[2 % number_of_labels];
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
