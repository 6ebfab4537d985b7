//! Strongly connected components via Kosaraju's algorithm.
//!
//! Two DFS passes:
//!
//! 1. A full [`Traversal`] of the graph records a finish time per vertex.
//! 2. The transpose is explored from each vertex in decreasing finish order.
//!    Every tree of that second forest is one component.
//!
//! Reference: Sharir, "A strong-connectivity algorithm and its applications
//! in data flow analysis," 1981.

use log::debug;
use serde::Serialize;

use crate::adjacency::Slot;
use crate::dfs::{Mark, Traversal};
use crate::graph::{Digraph, Vertex};

/// A partition of a graph's vertices into strongly connected components.
///
/// Components are numbered in the order the second pass extracts them
/// (decreasing finish time of their first vertex). Members of each component
/// are listed in discovery order, starting with the vertex the pass began at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccPartition {
    components: Vec<Vec<Vertex>>,
    cyclic: Vec<bool>,
    #[serde(skip)]
    component_of: Vec<usize>,
}

impl SccPartition {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Vec<Vertex>] {
        &self.components
    }

    /// Index of the component containing `v`, or `None` if `v` is not a vertex.
    pub fn component_index(&self, v: Vertex) -> Option<usize> {
        v.checked_sub(1)
            .and_then(|slot| self.component_of.get(slot))
            .copied()
    }

    /// Members of the component containing `v`.
    pub fn component(&self, v: Vertex) -> Option<&[Vertex]> {
        self.component_index(v).map(|i| self.components[i].as_slice())
    }

    pub(crate) fn index_at(&self, slot: Slot) -> usize {
        self.component_of[slot]
    }

    pub(crate) fn component_at(&self, slot: Slot) -> &[Vertex] {
        &self.components[self.component_of[slot]]
    }

    /// A component is cyclic if it has several members or a self-loop.
    pub fn is_cyclic(&self, index: usize) -> bool {
        self.cyclic.get(index).copied().unwrap_or(false)
    }

    /// Components that contain at least one cycle.
    pub fn cyclic_components(&self) -> impl Iterator<Item = &[Vertex]> + '_ {
        self.components
            .iter()
            .zip(&self.cyclic)
            .filter(|(_, cyclic)| **cyclic)
            .map(|(members, _)| members.as_slice())
    }
}

/// Partitions `graph` into strongly connected components.
///
/// Every vertex lands in exactly one component. Two vertices share a
/// component iff each is reachable from the other.
///
/// The transpose built for the second pass is dropped before returning.
///
/// # Complexity
/// * Time: O(V + E), plus O(range of finish times) ≤ O(V + E) for ordering
/// * Space: O(V + E) for the transpose
///
/// # Example
/// ```
/// use digraph_scc::graph::Digraph;
/// use digraph_scc::scc::kosaraju_scc;
///
/// // 1 → 2 → 3 → 1, 3 → 4
/// let g = Digraph::from_edges(4, [(1, 2), (2, 3), (3, 1), (3, 4)]).unwrap();
/// let scc = kosaraju_scc(&g);
/// assert_eq!(scc.len(), 2);
/// assert_eq!(scc.component(1).map(<[_]>::len), Some(3));
/// assert_eq!(scc.component(4), Some(&[4][..]));
/// ```
pub fn kosaraju_scc(graph: &Digraph) -> SccPartition {
    let n = graph.order();

    let mut forward = Traversal::new(graph);
    forward.run();
    let order = forward.slots_by_decreasing_finish();

    let transpose = graph.transpose();
    let mut backward = Traversal::new(&transpose);
    backward.reset_marks();

    let mut components: Vec<Vec<Vertex>> = Vec::new();
    let mut component_of = vec![usize::MAX; n];
    let mut clock = 0;
    let mut group: Vec<Slot> = Vec::new();

    for slot in order {
        if backward.mark_at(slot) != Mark::Unvisited {
            continue;
        }
        group.clear();
        clock = backward.visit_slot(slot, clock, Some(&mut group)) + 1;

        let index = components.len();
        for &member in &group {
            component_of[member] = index;
        }
        components.push(group.iter().map(|&member| member + 1).collect());
    }
    debug_assert!(component_of.iter().all(|&i| i != usize::MAX));

    let cyclic = components
        .iter()
        .map(|members| match members.as_slice() {
            [only] => graph.adjacency(only - 1).contains(only - 1),
            _ => true,
        })
        .collect();

    debug!(
        "kosaraju: {} vertices, {} edges -> {} components",
        n,
        graph.size(),
        components.len()
    );

    SccPartition {
        components,
        cyclic,
        component_of,
    }
}
