//! Search nodes and the per-search arena that owns them.

use crate::world::Cell;

/// Index of a node inside a [`NodeArena`].
pub type NodeId = usize;

/// A cell reached during search together with how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub cell: Cell,
    /// Node this one was reached from; `None` only for the start node
    pub parent: Option<NodeId>,
    /// Accumulated cost from the start
    pub g_cost: f64,
    /// Heuristic estimate to the goal
    pub h_cost: f64,
}

impl Node {
    /// Creates the root node of a search.
    pub fn root(cell: Cell, h_cost: f64) -> Self {
        Self {
            cell,
            parent: None,
            g_cost: 0.0,
            h_cost,
        }
    }

    /// Estimated total cost of a path through this node.
    pub fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Append-only storage for the nodes of one search.
///
/// Parent links are indices into the arena, so the whole tree is dropped in
/// one go when the search returns. Nodes replaced by a cheaper route stay in
/// the arena; they are simply no longer referenced by the open set.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node and returns its id.
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Node with the given id. Ids come from [`push`](Self::push) on the
    /// same arena.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes ever created in this search.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been created yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `id` back to the root and returns the cells
    /// in start-to-end order.
    pub fn reconstruct(&self, id: NodeId) -> Vec<Cell> {
        let mut cells = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            cells.push(node.cell);
            current = node.parent;
        }
        cells.reverse();
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f_cost() {
        let node = Node {
            cell: Cell::origin(),
            parent: None,
            g_cost: 2.5,
            h_cost: 1.5,
        };
        assert_eq!(node.f_cost(), 4.0);
    }

    #[test]
    fn test_reconstruct_follows_parents() {
        let mut arena = NodeArena::new();
        let root = arena.push(Node::root(Cell::new(0, 1, 0), 2.0));
        let mid = arena.push(Node {
            cell: Cell::new(1, 1, 0),
            parent: Some(root),
            g_cost: 1.0,
            h_cost: 1.0,
        });
        // A sibling that is not on the final path.
        arena.push(Node {
            cell: Cell::new(0, 1, 1),
            parent: Some(root),
            g_cost: 1.0,
            h_cost: 2.2,
        });
        let end = arena.push(Node {
            cell: Cell::new(2, 1, 0),
            parent: Some(mid),
            g_cost: 2.0,
            h_cost: 0.0,
        });

        assert_eq!(arena.len(), 4);
        assert_eq!(
            arena.reconstruct(end),
            vec![Cell::new(0, 1, 0), Cell::new(1, 1, 0), Cell::new(2, 1, 0)]
        );
        assert_eq!(arena.reconstruct(root), vec![Cell::new(0, 1, 0)]);
    }
}
