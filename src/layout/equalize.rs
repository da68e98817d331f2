//! Evenness pass for general trees.
//!
//! Conflict resolution packs each subtree as far left as it can go, which
//! leaves small subtrees wedged between large ones bunched up against their
//! left neighbour. Once the rightmost child of a parent is placed, the
//! children in between are nudged right toward an even spacing. One pass,
//! best effort: leftover unevenness is accepted.

use log::trace;

use super::position::{TOLERANCE, resolve_conflicts};
use crate::tree::{NodeId, Tree};

/// Spread the children of `parent` toward even spacing between its first and
/// last child. Returns the number of children whose conflict re-check did
/// not settle.
pub(crate) fn spread<L>(tree: &mut Tree<L>, parent: NodeId, distance: f64) -> usize {
    let children = tree.children(parent).to_vec();
    let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
        return 0;
    };
    let intervals = children.len() - 1;
    if intervals < 2 {
        return 0;
    }
    let desired = (tree.get(last).x - tree.get(first).x) / intervals as f64;
    let mut unconverged = 0;

    for pair in children.windows(2) {
        let (left, current) = (pair[0], pair[1]);
        // The first interval is against the leftmost child, which never moves
        if left != first && !resolve_conflicts(tree, current, distance) {
            unconverged += 1;
        }
        let gap = tree.get(current).x - tree.get(left).x;
        if gap + TOLERANCE < desired {
            trace!("spread {current} right by {}", desired - gap);
            tree.shift_subtree(current, desired - gap);
        }
    }
    unconverged
}
