//! Conversion into `petgraph` for callers that want its algorithm suite.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::{Digraph, Vertex};

/// Node weights are the 1-based vertex ids; node index `i` is vertex `i + 1`.
impl From<&Digraph> for DiGraph<Vertex, ()> {
    fn from(graph: &Digraph) -> Self {
        let mut out = DiGraph::with_capacity(graph.order(), graph.size());
        for v in 1..=graph.order() {
            out.add_node(v);
        }
        for (u, v) in graph.edges() {
            out.add_edge(NodeIndex::new(u - 1), NodeIndex::new(v - 1), ());
        }
        out
    }
}
