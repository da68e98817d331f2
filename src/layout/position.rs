//! Bottom-up positioning pass for general trees.
//!
//! Nodes are visited in postorder, so every child is placed before its
//! parent. A node's provisional `x` is relative to its siblings only; the
//! amount its descendants still have to move is parked in `modifier` and paid
//! out by the finalization pass.

use log::{trace, warn};

use super::contour::{left_contour, min_gap, right_contour};
use crate::tree::{NodeId, Tree};

/// Slack for float comparisons between positions built from sums of halves.
pub(crate) const TOLERANCE: f64 = 1e-9;

/// Give `id` its provisional position from its children and left sibling.
///
/// A parent is centered over its first and last child (for a single child
/// that is the child itself). A node that is not the leftmost sibling goes
/// one distance right of its left neighbour instead, and the difference from
/// the centered position is owed to its subtree through `modifier`.
pub(crate) fn place<L>(tree: &mut Tree<L>, id: NodeId, distance: f64) {
    let previous = tree.previous_sibling(id).map(|p| tree.get(p).x);
    let node = tree.get(id);
    let center = match (node.children.first(), node.children.last()) {
        (Some(&first), Some(&last)) => Some((tree.get(first).x + tree.get(last).x) / 2.0),
        _ => None,
    };

    let node = tree.get_mut(id);
    match (previous, center) {
        (None, None) => node.x = 0.0,
        (None, Some(center)) => node.x = center,
        (Some(previous), None) => node.x = previous + distance,
        (Some(previous), Some(center)) => {
            node.x = previous + distance;
            node.modifier = node.x - center;
        }
    }
}

/// Push `id`'s subtree right until it clears every earlier sibling's subtree
/// by at least `distance` at every shared depth.
///
/// Shifts only ever widen the gaps already checked, so a pass without a
/// shift means every earlier sibling is clear. Gives up after one pass more
/// than there are earlier siblings and returns `false`.
pub(crate) fn resolve_conflicts<L>(tree: &mut Tree<L>, id: NodeId, distance: f64) -> bool {
    let earlier = tree.earlier_siblings(id).to_vec();
    if earlier.is_empty() {
        return true;
    }
    let neighbours: Vec<_> = earlier.iter().map(|&s| right_contour(tree, s)).collect();
    let mut outline = left_contour(tree, id);

    for _ in 0..=earlier.len() {
        let mut moved = false;
        for (sibling, neighbour) in earlier.iter().zip(&neighbours) {
            let Some(gap) = min_gap(neighbour, &outline) else {
                continue;
            };
            if gap + TOLERANCE < distance {
                let shortfall = distance - gap;
                trace!("shift {id} right by {shortfall} to clear {sibling}");
                tree.shift_subtree(id, shortfall);
                outline.shift(shortfall);
                moved = true;
            }
        }
        if !moved {
            return true;
        }
    }

    warn!(
        "conflict resolution for {id} did not settle after {} passes",
        earlier.len() + 1
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_leaves() {
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let a = tree.add_child(root, ()).unwrap();
        let b = tree.add_child(root, ()).unwrap();
        place(&mut tree, a, 1.0);
        place(&mut tree, b, 1.0);
        assert_eq!(tree.get(a).x(), 0.0);
        assert_eq!(tree.get(b).x(), 1.0);
        place(&mut tree, root, 1.0);
        assert_eq!(tree.get(root).x(), 0.5);
        assert_eq!(tree.get(root).modifier(), 0.0);
    }

    #[test]
    fn test_place_non_leftmost_parent_records_modifier() {
        // root → (a, p → (c, d))
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let a = tree.add_child(root, ()).unwrap();
        let p = tree.add_child(root, ()).unwrap();
        let c = tree.add_child(p, ()).unwrap();
        let d = tree.add_child(p, ()).unwrap();
        for id in [a, c, d, p] {
            place(&mut tree, id, 2.0);
        }
        // children at 0 and 2 center to 1; p sits at a.x + 2
        assert_eq!(tree.get(p).x(), 2.0);
        assert_eq!(tree.get(p).modifier(), 1.0);
    }

    #[test]
    fn test_resolve_conflicts_clears_deep_overlap() {
        // root → (a → (a1, a2), b → (b1, b2))
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let a = tree.add_child(root, ()).unwrap();
        let b = tree.add_child(root, ()).unwrap();
        let a1 = tree.add_child(a, ()).unwrap();
        let a2 = tree.add_child(a, ()).unwrap();
        let b1 = tree.add_child(b, ()).unwrap();
        let b2 = tree.add_child(b, ()).unwrap();
        for id in [a1, a2, a, b1, b2, b] {
            place(&mut tree, id, 1.0);
        }
        // a at 0.5; b at 1.5 owing its children 1.0, so b1 lands on a2 at 1.0
        // and b has to move a full distance.
        assert!(resolve_conflicts(&mut tree, b, 1.0));
        assert_eq!(tree.get(b).x(), 2.5);
        let gap = min_gap(&right_contour(&tree, a), &left_contour(&tree, b)).unwrap();
        assert!((gap - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_resolve_conflicts_without_earlier_siblings() {
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let only = tree.add_child(root, ()).unwrap();
        assert!(resolve_conflicts(&mut tree, only, 1.0));
        assert_eq!(tree.get(only).x(), 0.0);
    }
}
