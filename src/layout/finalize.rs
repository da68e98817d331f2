//! Normalization and finalization for general trees.

use super::contour::left_contour;
use crate::tree::{NodeId, Tree};

/// Shift the whole tree right so its leftmost node sits at `x = 0` if any
/// node would otherwise end up left of it. Returns the shift applied.
pub(crate) fn normalize<L>(tree: &mut Tree<L>) -> f64 {
    let Some(root) = tree.root() else {
        return 0.0;
    };
    match left_contour(tree, root).min() {
        Some(min) if min < 0.0 => {
            tree.shift_subtree(root, -min);
            -min
        }
        _ => 0.0,
    }
}

/// Pay out every pending `modifier`, top-down over `preorder`.
///
/// Afterwards each `x` is absolute and each `modifier` is zero, so running
/// this again changes nothing.
pub(crate) fn finalize<L>(tree: &mut Tree<L>, preorder: &[NodeId]) {
    let mut owed = vec![0.0f64; tree.len()];
    for &id in preorder {
        let inherited = tree.parent(id).map_or(0.0, |p| owed[p.index()]);
        let node = tree.get_mut(id);
        node.x += inherited;
        owed[id.index()] = inherited + node.modifier;
        node.modifier = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::traverse;

    #[test]
    fn test_finalize_pays_out_modifiers() {
        // root(mod 1) → a(mod 2) → b
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let a = tree.add_child(root, ()).unwrap();
        let b = tree.add_child(a, ()).unwrap();
        tree.get_mut(root).modifier = 1.0;
        tree.get_mut(a).modifier = 2.0;
        tree.get_mut(b).x = 0.5;

        let order = traverse::preorder(&tree).unwrap();
        finalize(&mut tree, &order);
        assert_eq!(tree.get(root).x(), 0.0);
        assert_eq!(tree.get(a).x(), 1.0);
        assert_eq!(tree.get(b).x(), 3.5);
        assert!(tree.iter().all(|(_, node)| node.modifier() == 0.0));

        finalize(&mut tree, &order);
        assert_eq!(tree.get(b).x(), 3.5);
    }

    #[test]
    fn test_normalize_shifts_negative_tree() {
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        let a = tree.add_child(root, ()).unwrap();
        tree.get_mut(a).x = -1.5;

        assert_eq!(normalize(&mut tree), 1.5);
        let order = traverse::preorder(&tree).unwrap();
        finalize(&mut tree, &order);
        assert_eq!(tree.get(a).x(), 0.0);
        assert_eq!(tree.get(root).x(), 1.5);
    }

    #[test]
    fn test_normalize_leaves_positive_tree() {
        let mut tree = Tree::new();
        let root = tree.add_root(()).unwrap();
        tree.get_mut(root).x = 2.0;
        assert_eq!(normalize(&mut tree), 0.0);
        assert_eq!(tree.get(root).x(), 2.0);
    }
}
