//! Depth/vertical pass.
//!
//! Walks the tree top-down and gives every node its depth (root = 0) and a
//! `y` of `depth * min_vertical_distance`. Shared by both tree variants.

use log::debug;

use crate::error::Result;
use crate::tree::traverse::{self, Hierarchy};
use crate::tree::{BinaryTree, NodeId, Tree};

/// A tree whose nodes can store the result of the depth pass.
pub(crate) trait Levelled: Hierarchy {
    fn set_level(&mut self, id: NodeId, depth: u32, y: f64);
}

impl<L> Levelled for Tree<L> {
    fn set_level(&mut self, id: NodeId, depth: u32, y: f64) {
        let node = self.get_mut(id);
        node.depth = depth;
        node.y = y;
    }
}

impl<T> Levelled for BinaryTree<T> {
    fn set_level(&mut self, id: NodeId, depth: u32, y: f64) {
        let node = self.get_mut(id);
        node.depth = depth;
        node.y = y;
    }
}

/// Assign depth and `y` to every reachable node. Returns the preorder used,
/// so later top-down passes can reuse it.
pub(crate) fn assign<T: Levelled>(tree: &mut T, min_vertical_distance: f64) -> Result<Vec<NodeId>> {
    let order = traverse::preorder(&*tree)?;
    let mut depths = vec![0u32; tree.node_count()];

    for &id in &order {
        let depth = tree.parent_of(id).map_or(0, |p| depths[p.index()] + 1);
        depths[id.index()] = depth;
        tree.set_level(id, depth, f64::from(depth) * min_vertical_distance);
    }

    let max_depth = order.iter().map(|id| depths[id.index()]).max().unwrap_or(0);
    debug!("depth pass: {} nodes over {} levels", order.len(), max_depth + 1);
    Ok(order)
}
