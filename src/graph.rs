use log::debug;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cell::OnceCell;
use thiserror::Error;

use crate::adjacency::{AdjacencyList, Slot};
use crate::scc::{SccPartition, kosaraju_scc};

/// A vertex identifier. Public APIs are 1-based: valid vertices are `1..=order`.
pub type Vertex = usize;

/// Errors reported by graph construction and vertex-taking operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {vertex} is out of range (graph has {order} vertices)")]
    InvalidVertex { vertex: Vertex, order: usize },
    #[error("cannot allocate a graph with {order} vertices")]
    CapacityExceeded { order: usize },
}

/// Outcome of [`Digraph::add_edge`] on valid vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEdge {
    Inserted,
    AlreadyExists,
}

/// Outcome of [`Digraph::delete_edge`] on valid vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteEdge {
    Deleted,
    NotFound,
}

/// A directed graph over a fixed vertex set `1..=order`.
///
/// Each vertex owns an [`AdjacencyList`] kept strictly ascending, so edge
/// iteration, rendering and traversal are all deterministic. Self-loops are
/// allowed; parallel edges are not.
///
/// Strongly connected components are computed on demand with
/// [`kosaraju_scc`] and cached until the next successful mutation.
///
/// # Example
/// ```
/// use digraph_scc::graph::{AddEdge, Digraph};
///
/// let mut g = Digraph::new(4);
/// for (u, v) in [(1, 2), (2, 3), (3, 1), (3, 4)] {
///     assert_eq!(g.add_edge(u, v), Ok(AddEdge::Inserted));
/// }
/// assert_eq!(g.count_scc(), 2);
/// assert_eq!(g.scc_size(1), Ok(3));
/// assert_eq!(g.same_scc(1, 4), Ok(false));
/// ```
#[derive(Debug, Clone)]
pub struct Digraph {
    adjacency: Vec<AdjacencyList>,
    num_edges: usize,
    scc_cache: OnceCell<SccPartition>,
}

impl Digraph {
    /// Creates a graph with `order` vertices and no edges.
    ///
    /// Panics if the vertex table cannot be allocated; use [`Digraph::try_new`]
    /// when `order` comes from untrusted input.
    pub fn new(order: usize) -> Self {
        Self {
            adjacency: vec![AdjacencyList::new(); order],
            num_edges: 0,
            scc_cache: OnceCell::new(),
        }
    }

    /// Like [`Digraph::new`], but reports a failed allocation instead of
    /// panicking.
    pub fn try_new(order: usize) -> Result<Self, GraphError> {
        let mut adjacency = Vec::new();
        adjacency
            .try_reserve_exact(order)
            .map_err(|_| GraphError::CapacityExceeded { order })?;
        adjacency.resize_with(order, AdjacencyList::new);
        Ok(Self {
            adjacency,
            num_edges: 0,
            scc_cache: OnceCell::new(),
        })
    }

    /// Creates a graph with `order` vertices and the given edges.
    ///
    /// Repeated edges are inserted once. Fails on the first edge naming a
    /// vertex outside `1..=order`.
    pub fn from_edges<I>(order: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        let mut graph = Self::new(order);
        for (u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges.
    pub fn size(&self) -> usize {
        self.num_edges
    }

    pub fn contains_vertex(&self, vertex: Vertex) -> bool {
        (1..=self.order()).contains(&vertex)
    }

    pub(crate) fn slot(&self, vertex: Vertex) -> Result<Slot, GraphError> {
        if self.contains_vertex(vertex) {
            Ok(vertex - 1)
        } else {
            Err(GraphError::InvalidVertex {
                vertex,
                order: self.order(),
            })
        }
    }

    pub(crate) fn adjacency(&self, slot: Slot) -> &AdjacencyList {
        &self.adjacency[slot]
    }

    pub fn out_degree(&self, u: Vertex) -> Result<usize, GraphError> {
        let u = self.slot(u)?;
        Ok(self.adjacency[u].len())
    }

    /// Outgoing neighbors of `u`, ascending.
    pub fn neighbors(
        &self,
        u: Vertex,
    ) -> Result<impl ExactSizeIterator<Item = Vertex> + '_, GraphError> {
        let u = self.slot(u)?;
        Ok(self.adjacency[u].as_slice().iter().map(|&slot| slot + 1))
    }

    pub fn has_edge(&self, u: Vertex, v: Vertex) -> Result<bool, GraphError> {
        let (u, v) = (self.slot(u)?, self.slot(v)?);
        Ok(self.adjacency[u].contains(v))
    }

    /// Every edge `(u, v)`, ascending by `u` and then by `v`.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, list)| list.iter().map(move |v| (u + 1, v + 1)))
    }

    /// Adds the edge `u → v`, keeping `u`'s neighbors ascending.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<AddEdge, GraphError> {
        let (u, v) = (self.slot(u)?, self.slot(v)?);
        if !self.adjacency[u].insert(v) {
            return Ok(AddEdge::AlreadyExists);
        }
        self.num_edges += 1;
        self.invalidate_scc();
        Ok(AddEdge::Inserted)
    }

    /// Removes the edge `u → v` if present.
    pub fn delete_edge(&mut self, u: Vertex, v: Vertex) -> Result<DeleteEdge, GraphError> {
        let (u, v) = (self.slot(u)?, self.slot(v)?);
        if !self.adjacency[u].remove(v) {
            return Ok(DeleteEdge::NotFound);
        }
        self.num_edges -= 1;
        self.invalidate_scc();
        Ok(DeleteEdge::Deleted)
    }

    /// Removes every edge. The vertex count is unchanged.
    pub fn clear(&mut self) {
        for list in &mut self.adjacency {
            list.clear();
        }
        self.num_edges = 0;
        self.invalidate_scc();
    }

    /// Returns a graph of the same order with every edge reversed.
    ///
    /// Sources are visited in ascending order, so each reversed list is
    /// built already sorted.
    pub fn transpose(&self) -> Digraph {
        let mut reversed = Digraph::new(self.order());
        for (u, list) in self.adjacency.iter().enumerate() {
            for v in list.iter() {
                reversed.adjacency[v].push_ascending(u);
            }
        }
        reversed.num_edges = self.num_edges;
        reversed
    }

    fn invalidate_scc(&mut self) {
        if self.scc_cache.take().is_some() {
            debug!("dropping cached SCC partition after mutation");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Strongly connected components
    // ─────────────────────────────────────────────────────────────────────

    /// The SCC partition of the current graph, computed on first use.
    pub fn scc(&self) -> &SccPartition {
        self.scc_cache.get_or_init(|| kosaraju_scc(self))
    }

    /// Number of strongly connected components.
    pub fn count_scc(&self) -> usize {
        self.scc().len()
    }

    /// Number of vertices in the component containing `u`, including `u`.
    pub fn scc_size(&self, u: Vertex) -> Result<usize, GraphError> {
        let u = self.slot(u)?;
        Ok(self.scc().component_at(u).len())
    }

    /// Whether `u` and `v` are mutually reachable. A vertex is always in
    /// its own component.
    pub fn same_scc(&self, u: Vertex, v: Vertex) -> Result<bool, GraphError> {
        let (u, v) = (self.slot(u)?, self.slot(v)?);
        if u == v {
            return Ok(true);
        }
        let scc = self.scc();
        Ok(scc.index_at(u) == scc.index_at(v))
    }
}

impl PartialEq for Digraph {
    fn eq(&self, other: &Self) -> bool {
        self.adjacency == other.adjacency
    }
}

impl Eq for Digraph {}

impl Serialize for Digraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let edges: Vec<(Vertex, Vertex)> = self.edges().collect();
        let mut state = serializer.serialize_struct("Digraph", 3)?;
        state.serialize_field("order", &self.order())?;
        state.serialize_field("size", &self.size())?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
