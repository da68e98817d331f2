//! Read-only view of a rooted tree and the traversal orders built on it.
//!
//! Both tree variants implement [`Hierarchy`], so the depth pass, the
//! finalization order and coordinate export are written once. Traversals are
//! iterative and produce node lists instead of taking callbacks; they detect a
//! node being reached twice and fail rather than looping.

use super::NodeId;
use crate::error::{LayoutError, Result, StructuralError};

/// A rooted tree stored in an arena.
pub trait Hierarchy {
    /// The root, or `None` for an empty tree.
    fn root(&self) -> Option<NodeId>;

    /// Number of arena slots (an upper bound on reachable nodes).
    fn node_count(&self) -> usize;

    fn parent_of(&self, id: NodeId) -> Option<NodeId>;

    /// Children of `id`, left to right.
    fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_;
}

/// A tree whose nodes carry a position.
pub trait Positioned: Hierarchy {
    fn position(&self, id: NodeId) -> (f64, f64);

    fn depth_of(&self, id: NodeId) -> u32;
}

fn mark_visited(visited: &mut [bool], id: NodeId) -> Result<()> {
    let seen = visited.get_mut(id.index()).ok_or_else(|| {
        LayoutError::invalid_argument(format!("{id} is not part of this tree"))
    })?;
    if *seen {
        return Err(StructuralError::Cycle { node: id }.into());
    }
    *seen = true;
    Ok(())
}

/// Nodes reachable from the root, parents before children, siblings left to
/// right.
pub fn preorder<H: Hierarchy>(tree: &H) -> Result<Vec<NodeId>> {
    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    let mut visited = vec![false; tree.node_count()];
    let mut order = Vec::with_capacity(tree.node_count());
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        mark_visited(&mut visited, id)?;
        order.push(id);
        let start = stack.len();
        stack.extend(tree.children_of(id));
        // Leftmost child must pop first
        stack[start..].reverse();
    }
    Ok(order)
}

/// Nodes reachable from the root, children (left to right) before parents.
pub fn postorder<H: Hierarchy>(tree: &H) -> Result<Vec<NodeId>> {
    let Some(root) = tree.root() else {
        return Ok(Vec::new());
    };
    let mut visited = vec![false; tree.node_count()];
    let mut order = Vec::with_capacity(tree.node_count());
    let mut stack = vec![root];

    // Node, then children right to left; reversed this is a left-to-right postorder.
    while let Some(id) = stack.pop() {
        mark_visited(&mut visited, id)?;
        order.push(id);
        stack.extend(tree.children_of(id));
    }
    order.reverse();
    Ok(order)
}

/// All descendants of `id` (excluding `id` itself) in preorder.
pub fn descendants<H: Hierarchy>(tree: &H, id: NodeId) -> Result<Vec<NodeId>> {
    let mut visited = vec![false; tree.node_count()];
    mark_visited(&mut visited, id)?;
    let mut order = Vec::new();
    let mut stack: Vec<NodeId> = tree.children_of(id).collect();
    stack.reverse();

    while let Some(next) = stack.pop() {
        mark_visited(&mut visited, next)?;
        order.push(next);
        let start = stack.len();
        stack.extend(tree.children_of(next));
        stack[start..].reverse();
    }
    Ok(order)
}
