//! Depth-first traversal with discovery and finish timestamps.
//!
//! All per-pass scratch state (marks, timestamps, observed finish range)
//! lives in a [`Traversal`] borrowed over a [`Digraph`]. The graph itself
//! stays untouched, so separate traversals of one graph never share marks.
//!
//! The walk uses an explicit frame stack instead of recursion, so depth is
//! bounded by heap memory rather than the call stack. Neighbors are visited
//! in ascending order, which makes every timestamp reproducible.
//!
//! # Clock
//!
//! For a call started at clock `t` on vertex `u`:
//!
//! 1. `discovery[u] = t`, the clock advances by one.
//! 2. Each still-unvisited neighbor is explored at the current clock, and the
//!    clock advances by one more after that child returns.
//! 3. `finish[u]` is the clock value once all children are done.
//!
//! A full traversal starts each new root at one past the largest finish time
//! observed so far, so finish times are distinct across the whole forest.

use log::trace;
use std::ops::RangeInclusive;

use crate::adjacency::Slot;
use crate::graph::{Digraph, GraphError, Vertex};

/// A DFS timestamp.
pub type Time = usize;

/// Per-vertex traversal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Unvisited,
    InProgress,
    AllDone,
}

/// Scratch state for DFS passes over one graph.
#[derive(Debug, Clone)]
pub struct Traversal<'g> {
    graph: &'g Digraph,
    marks: Vec<Mark>,
    discovery: Vec<Time>,
    finish: Vec<Time>,
    /// (lowest, highest) finish time seen since the last reset.
    finish_bounds: Option<(Time, Time)>,
}

struct Frame {
    slot: Slot,
    next_neighbor: usize,
}

impl<'g> Traversal<'g> {
    pub fn new(graph: &'g Digraph) -> Self {
        let n = graph.order();
        Self {
            graph,
            marks: vec![Mark::Unvisited; n],
            discovery: vec![0; n],
            finish: vec![0; n],
            finish_bounds: None,
        }
    }

    /// Marks every vertex unvisited and forgets the observed finish range.
    /// Timestamps of earlier passes become unreadable.
    pub fn reset_marks(&mut self) {
        self.marks.fill(Mark::Unvisited);
        self.finish_bounds = None;
    }

    /// Runs a DFS from every unvisited vertex in ascending id order, covering
    /// the whole graph. Marks are reset first.
    pub fn run(&mut self) {
        self.reset_marks();
        for slot in 0..self.marks.len() {
            if self.marks[slot] == Mark::Unvisited {
                let start = self.next_root_time();
                trace!("dfs root {} at t={}", slot + 1, start);
                self.visit_slot(slot, start, None);
            }
        }
    }

    /// Explores everything reachable from `start` that is still unvisited,
    /// beginning at the next root time. Returns `start`'s finish time.
    ///
    /// A vertex that is already visited is left alone and its recorded
    /// finish time (if any) is returned.
    pub fn visit_from(&mut self, start: Vertex) -> Result<Time, GraphError> {
        let clock = self.next_root_time();
        self.visit_at(start, clock)
    }

    /// Like [`visit_from`](Self::visit_from), with `start` discovered at `clock`.
    pub fn visit_at(&mut self, start: Vertex, clock: Time) -> Result<Time, GraphError> {
        let slot = self.graph.slot(start)?;
        if self.marks[slot] != Mark::Unvisited {
            return Ok(self.finish[slot]);
        }
        Ok(self.visit_slot(slot, clock, None))
    }

    fn next_root_time(&self) -> Time {
        self.finish_bounds.map_or(0, |(_, highest)| highest + 1)
    }

    /// Core explicit-stack DFS from `start` at `clock`.
    ///
    /// Every vertex newly discovered by this call, `start` first, is appended
    /// to `discovered` in discovery order. Returns `start`'s finish time.
    pub(crate) fn visit_slot(
        &mut self,
        start: Slot,
        mut clock: Time,
        mut discovered: Option<&mut Vec<Slot>>,
    ) -> Time {
        debug_assert_eq!(self.marks[start], Mark::Unvisited);
        let graph = self.graph;

        self.discover(start, &mut clock);
        if let Some(acc) = discovered.as_deref_mut() {
            acc.push(start);
        }
        let mut stack = vec![Frame {
            slot: start,
            next_neighbor: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let v = frame.slot;
            let neighbors = graph.adjacency(v).as_slice();

            if frame.next_neighbor < neighbors.len() {
                let w = neighbors[frame.next_neighbor];
                frame.next_neighbor += 1;
                if self.marks[w] == Mark::Unvisited {
                    self.discover(w, &mut clock);
                    if let Some(acc) = discovered.as_deref_mut() {
                        acc.push(w);
                    }
                    stack.push(Frame {
                        slot: w,
                        next_neighbor: 0,
                    });
                }
            } else {
                self.complete(v, clock);
                stack.pop();
                // Returning into the parent advances its clock.
                if !stack.is_empty() {
                    clock += 1;
                }
            }
        }

        clock
    }

    fn discover(&mut self, slot: Slot, clock: &mut Time) {
        self.discovery[slot] = *clock;
        *clock += 1;
        self.marks[slot] = Mark::InProgress;
    }

    fn complete(&mut self, slot: Slot, clock: Time) {
        self.finish[slot] = clock;
        self.marks[slot] = Mark::AllDone;
        self.finish_bounds = Some(match self.finish_bounds {
            Some((lowest, highest)) => (lowest.min(clock), highest.max(clock)),
            None => (clock, clock),
        });
    }

    pub(crate) fn mark_at(&self, slot: Slot) -> Mark {
        self.marks[slot]
    }

    pub fn mark(&self, v: Vertex) -> Result<Mark, GraphError> {
        Ok(self.marks[self.graph.slot(v)?])
    }

    /// Discovery time of `v` in the current pass, if it has been reached.
    pub fn discovery_time(&self, v: Vertex) -> Result<Option<Time>, GraphError> {
        let slot = self.graph.slot(v)?;
        Ok((self.marks[slot] != Mark::Unvisited).then_some(self.discovery[slot]))
    }

    /// Finish time of `v` in the current pass, if its exploration completed.
    pub fn finish_time(&self, v: Vertex) -> Result<Option<Time>, GraphError> {
        let slot = self.graph.slot(v)?;
        Ok((self.marks[slot] == Mark::AllDone).then_some(self.finish[slot]))
    }

    /// Lowest through highest finish time observed since the last reset.
    pub fn finish_range(&self) -> Option<RangeInclusive<Time>> {
        self.finish_bounds.map(|(lowest, highest)| lowest..=highest)
    }

    /// Finished vertices ordered by decreasing finish time.
    ///
    /// Walks the finish range from highest to lowest, skipping values no
    /// vertex holds. Vertices sharing a value come out in ascending id order.
    pub(crate) fn slots_by_decreasing_finish(&self) -> Vec<Slot> {
        let Some((lowest, highest)) = self.finish_bounds else {
            return Vec::new();
        };
        let mut buckets: Vec<Vec<Slot>> = vec![Vec::new(); highest - lowest + 1];
        for slot in 0..self.marks.len() {
            if self.marks[slot] == Mark::AllDone {
                buckets[self.finish[slot] - lowest].push(slot);
            }
        }
        buckets.into_iter().rev().flatten().collect()
    }
}
