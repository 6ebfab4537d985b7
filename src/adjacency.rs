//! Ordered neighbor storage for a single vertex.
//!
//! An [`AdjacencyList`] keeps its entries strictly ascending with no
//! duplicates. Rendering and DFS visitation order both depend on it.

/// A 0-based vertex index as stored inside the graph.
pub type Slot = usize;

/// Outgoing neighbors of one vertex, strictly ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    neighbors: Vec<Slot>,
}

impl AdjacencyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `slot` at its sorted position.
    ///
    /// Returns `false` (and leaves the list untouched) if it was already present.
    pub fn insert(&mut self, slot: Slot) -> bool {
        match self.neighbors.binary_search(&slot) {
            Ok(_) => false,
            Err(pos) => {
                self.neighbors.insert(pos, slot);
                true
            }
        }
    }

    /// Removes `slot`, returning whether it was present.
    pub fn remove(&mut self, slot: Slot) -> bool {
        match self.neighbors.binary_search(&slot) {
            Ok(pos) => {
                self.neighbors.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.neighbors.binary_search(&slot).is_ok()
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn clear(&mut self) {
        self.neighbors.clear();
    }

    /// Neighbor slots in ascending order.
    pub fn as_slice(&self) -> &[Slot] {
        &self.neighbors
    }

    pub fn iter(&self) -> impl Iterator<Item = Slot> + '_ {
        self.neighbors.iter().copied()
    }

    /// Appends without searching. Only valid when `slot` is larger than every
    /// current entry; used when building a transpose in ascending source order.
    pub(crate) fn push_ascending(&mut self, slot: Slot) {
        debug_assert!(self.neighbors.last().is_none_or(|&last| last < slot));
        self.neighbors.push(slot);
    }
}
