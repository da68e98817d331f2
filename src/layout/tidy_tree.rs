//! Tidy layout for general (n-ary) trees.
//!
//! Produces layered drawings where parents sit centered over their children,
//! sibling subtrees never come closer than the configured minimum distance at
//! any shared depth, and identical subtrees are drawn identically.
//!
//! # Algorithm Overview
//!
//! 1. **Depth pass (top-down):** depth and `y` per node.
//! 2. **Positioning pass (bottom-up):** provisional `x` per node relative to
//!    its siblings. Conflicts with earlier sibling subtrees are resolved by
//!    comparing contours, shifting the whole subtree lazily through
//!    `modifier`.
//! 3. **Evenness pass:** after the last child of a parent is placed, the
//!    children in between are spread toward even spacing.
//! 4. **Normalization:** optional right shift so no node has a negative `x`.
//! 5. **Finalization (top-down):** pending modifiers are paid out, leaving
//!    absolute coordinates and zero modifiers everywhere.

use log::debug;

use super::{LayoutConfig, LayoutStats, depth, equalize, finalize, position};
use crate::error::Result;
use crate::tree::Tree;
use crate::tree::traverse;

/// The tidy tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TidyTreeLayout {
    config: LayoutConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a tidy tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `tree` in place. Only the layout fields of its nodes change.
    ///
    /// Running it again on the same tree yields the same coordinates. An
    /// empty tree is laid out trivially.
    pub fn layout<L>(&self, tree: &mut Tree<L>) -> Result<LayoutStats> {
        self.config.validate()?;
        let distance = self.config.min_horizontal_distance;

        let preorder = depth::assign(tree, self.config.min_vertical_distance)?;
        if preorder.is_empty() {
            return Ok(LayoutStats::default());
        }

        let mut unconverged = 0;
        for id in traverse::postorder(&*tree)? {
            tree.get_mut(id).modifier = 0.0;
            position::place(tree, id, distance);
            if !tree.is_leftmost(id) && !position::resolve_conflicts(tree, id, distance) {
                unconverged += 1;
            }
            if self.config.equalize
                && tree.is_rightmost(id)
                && let Some(parent) = tree.parent(id)
            {
                unconverged += equalize::spread(tree, parent, distance);
            }
        }
        debug!("positioning pass: {} nodes, {unconverged} unconverged", preorder.len());

        let normalization_shift = if self.config.normalize {
            finalize::normalize(tree)
        } else {
            0.0
        };
        finalize::finalize(tree, &preorder);

        let stats = LayoutStats {
            nodes: preorder.len(),
            unconverged,
            normalization_shift,
        };
        debug!("tidy tree layout complete: {stats:?}");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::tree::NodeId;

    fn xy(tree: &Tree<&str>, id: NodeId) -> (f64, f64) {
        let node = tree.node(id).unwrap();
        (node.x(), node.y())
    }

    #[test]
    fn test_single_node() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let stats = TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        assert_eq!(xy(&tree, root), (0.0, 0.0));
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.unconverged, 0);
    }

    #[test]
    fn test_root_with_two_leaves() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let l = tree.add_child(root, "l").unwrap();
        let r = tree.add_child(root, "r").unwrap();
        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        assert_eq!(xy(&tree, l), (0.0, 1.0));
        assert_eq!(xy(&tree, r), (1.0, 1.0));
        assert_eq!(xy(&tree, root), (0.5, 0.0));
    }

    #[test]
    fn test_root_with_three_leaves() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let leaves: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|label| tree.add_child(root, label).unwrap())
            .collect();
        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        let xs: Vec<f64> = leaves.iter().map(|&id| xy(&tree, id).0).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
        assert_eq!(xy(&tree, root).0, 1.0);
    }

    #[test]
    fn test_single_child_chain() {
        let mut tree = Tree::new();
        let mut id = tree.add_root("0").unwrap();
        let mut chain = vec![id];
        for label in ["1", "2", "3", "4"] {
            id = tree.add_child(id, label).unwrap();
            chain.push(id);
        }
        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        for (depth, &id) in chain.iter().enumerate() {
            assert_eq!(xy(&tree, id), (0.0, depth as f64));
        }
    }

    #[test]
    fn test_wide_subtree_next_to_narrow_subtree() {
        // root → (l → (l0, l1, l2, l3), r → (r0))
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let l = tree.add_child(root, "l").unwrap();
        let r = tree.add_child(root, "r").unwrap();
        let l_children: Vec<_> = ["l0", "l1", "l2", "l3"]
            .into_iter()
            .map(|label| tree.add_child(l, label).unwrap())
            .collect();
        let r0 = tree.add_child(r, "r0").unwrap();

        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        assert_eq!(xy(&tree, l), (1.5, 1.0));
        assert_eq!(xy(&tree, r), (4.0, 1.0));
        assert_eq!(xy(&tree, r0), (4.0, 2.0));
        assert_eq!(xy(&tree, root), (2.75, 0.0));
        let xs: Vec<f64> = l_children.iter().map(|&id| xy(&tree, id).0).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
        // Depth 2 shared by both subtrees: 4 - 3 >= 1
        assert!(xy(&tree, r0).0 - xy(&tree, l_children[3]).0 >= 1.0);
    }

    /// Greedy left-to-right packing is not mirror symmetric in general; this
    /// shape (wide subtree beside a narrow one) happens to reflect exactly.
    #[test]
    fn test_mirrored_wide_and_narrow_subtrees_reflect() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let l = tree.add_child(root, "l").unwrap();
        let r = tree.add_child(root, "r").unwrap();
        for label in ["l0", "l1", "l2", "l3"] {
            tree.add_child(l, label).unwrap();
        }
        tree.add_child(r, "r0").unwrap();
        let mut mirror = tree.mirrored();

        let layout = TidyTreeLayout::with_defaults();
        layout.layout(&mut tree).unwrap();
        layout.layout(&mut mirror).unwrap();

        let width = tree.iter().map(|(_, n)| n.x()).fold(f64::MIN, f64::max);
        for (id, node) in tree.iter() {
            let reflected = mirror.node(id).unwrap();
            assert!((reflected.x() - (width - node.x())).abs() < 1e-9, "{id}");
            assert_eq!(reflected.y(), node.y());
        }
    }

    #[test]
    fn test_normalization_removes_negative_x() {
        // root → (a, b → (b0, b1, b2, b3)): b's children start left of a
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let a = tree.add_child(root, "a").unwrap();
        let b = tree.add_child(root, "b").unwrap();
        let b0 = tree.add_child(b, "b0").unwrap();
        for label in ["b1", "b2", "b3"] {
            tree.add_child(b, label).unwrap();
        }

        let stats = TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        assert_eq!(stats.normalization_shift, 0.5);
        assert_eq!(xy(&tree, b0).0, 0.0);
        assert_eq!(xy(&tree, a).0, 0.5);
        assert_eq!(xy(&tree, b).0, 1.5);
        assert_eq!(xy(&tree, root).0, 1.0);

        let raw = LayoutConfig {
            normalize: false,
            ..LayoutConfig::default()
        };
        let stats = TidyTreeLayout::new(raw).layout(&mut tree).unwrap();
        assert_eq!(stats.normalization_shift, 0.0);
        assert_eq!(xy(&tree, b0).0, -0.5);
    }

    #[test]
    fn test_distances_scale_layout() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let l = tree.add_child(root, "l").unwrap();
        let r = tree.add_child(root, "r").unwrap();
        TidyTreeLayout::new(LayoutConfig::with_distances(10.0, 40.0))
            .layout(&mut tree)
            .unwrap();
        assert_eq!(xy(&tree, l), (0.0, 40.0));
        assert_eq!(xy(&tree, r), (10.0, 40.0));
        assert_eq!(xy(&tree, root), (5.0, 0.0));
    }

    #[test]
    fn test_relayout_is_stable() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let a = tree.add_child(root, "a").unwrap();
        let b = tree.add_child(root, "b").unwrap();
        tree.add_child(a, "a0").unwrap();
        tree.add_child(a, "a1").unwrap();
        tree.add_child(b, "b0").unwrap();

        let layout = TidyTreeLayout::with_defaults();
        layout.layout(&mut tree).unwrap();
        let first: Vec<_> = tree.iter().map(|(_, n)| (n.x(), n.y())).collect();
        layout.layout(&mut tree).unwrap();
        let second: Vec<_> = tree.iter().map(|(_, n)| (n.x(), n.y())).collect();
        assert_eq!(first, second);
        assert!(tree.iter().all(|(_, n)| n.modifier() == 0.0));
    }

    #[test]
    fn test_empty_tree() {
        let mut tree: Tree<&str> = Tree::new();
        let stats = TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        assert_eq!(stats, LayoutStats::default());
    }

    #[test]
    fn test_invalid_configuration_rejected_before_layout() {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        tree.get_mut(root).x = 7.0;
        let err = TidyTreeLayout::new(LayoutConfig::with_distances(0.0, 1.0))
            .layout(&mut tree)
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfiguration { .. }));
        assert_eq!(xy(&tree, root).0, 7.0);
    }
}
