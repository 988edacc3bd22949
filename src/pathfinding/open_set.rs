//! Open set for A*: a min-first priority queue on `f_cost` holding at most
//! one live entry per cell.
//!
//! Decrease-key is remove-then-reinsert. Removal only drops the cell from the
//! live index; its heap entry goes stale and is discarded when it surfaces.
//! Entries with equal `f_cost` come out in insertion order.

use super::node::NodeId;
use crate::world::Cell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

#[derive(Debug, Clone)]
struct OpenEntry {
    f_cost: f64,
    seq: u64,
    cell: Cell,
    node: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Priority queue of frontier nodes keyed by cell.
#[derive(Debug, Default)]
pub struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    live: HashMap<Cell, NodeId>,
    next_seq: u64,
}

impl OpenSet {
    /// Creates an empty open set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cells currently open.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no cell is open.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Node currently queued for the cell.
    pub fn get(&self, cell: Cell) -> Option<NodeId> {
        self.live.get(&cell).copied()
    }

    /// Queues a node for a cell that is not already open.
    ///
    /// Returns `false` and leaves the set untouched if the cell is open; use
    /// [`remove`](Self::remove) first to replace its entry.
    pub fn insert(&mut self, cell: Cell, node: NodeId, f_cost: f64) -> bool {
        if self.live.contains_key(&cell) {
            return false;
        }
        self.live.insert(cell, node);
        self.heap.push(OpenEntry {
            f_cost,
            seq: self.next_seq,
            cell,
            node,
        });
        self.next_seq += 1;
        true
    }

    /// Drops the live entry for a cell, returning the node it held.
    pub fn remove(&mut self, cell: Cell) -> Option<NodeId> {
        self.live.remove(&cell)
    }

    /// Removes and returns the node with the lowest `f_cost`.
    pub fn pop(&mut self) -> Option<NodeId> {
        while let Some(entry) = self.heap.pop() {
            if self.live.get(&entry.cell) == Some(&entry.node) {
                self.live.remove(&entry.cell);
                return Some(entry.node);
            }
        }
        None
    }
}
