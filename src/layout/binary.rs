//! Layout for binary trees.
//!
//! Works in integer columns, one column being `min_horizontal_distance`.
//! Every node keeps its children at a column offset (`relative_x`) and caches
//! the left and right contour of its subtree relative to itself, built from
//! the children's cached contours so no subtree is walked twice.
//!
//! A lone child goes one column to its own side, so left and right children
//! stay distinguishable. Two children are pushed apart symmetrically by an
//! even number of columns until their subtrees clear each other, which keeps
//! the parent exactly between them.

use log::debug;

use super::contour::{Contour, min_gap};
use super::{LayoutConfig, LayoutStats, depth};
use crate::error::Result;
use crate::tree::traverse;
use crate::tree::{BinaryTree, NodeId};

/// The binary tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct BinaryTreeLayout {
    config: LayoutConfig,
}

impl BinaryTreeLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `tree` in place. `equalize` has no effect on binary trees.
    pub fn layout<T>(&self, tree: &mut BinaryTree<T>) -> Result<LayoutStats> {
        self.config.validate()?;
        let preorder = depth::assign(tree, self.config.min_vertical_distance)?;
        let Some(&root) = preorder.first() else {
            return Ok(LayoutStats::default());
        };

        for id in traverse::postorder(&*tree)? {
            separate_children(tree, id);
        }

        let column = self.config.min_horizontal_distance;
        let leftmost = tree.get(root).left_contour.min().unwrap_or(0);
        let root_x = if self.config.normalize {
            (-leftmost) as f64 * column
        } else {
            0.0
        };

        let root_node = tree.get_mut(root);
        root_node.relative_x = 0;
        root_node.x = root_x;
        for &id in &preorder[1..] {
            let Some(parent) = tree.parent(id) else {
                continue;
            };
            let parent_x = tree.get(parent).x;
            let node = tree.get_mut(id);
            node.x = parent_x + node.relative_x as f64 * column;
        }

        let stats = LayoutStats {
            nodes: preorder.len(),
            unconverged: 0,
            normalization_shift: root_x,
        };
        debug!("binary tree layout complete: {stats:?}");
        Ok(stats)
    }
}

/// Fix the column offsets of `id`'s children and rebuild `id`'s contours.
fn separate_children<T>(tree: &mut BinaryTree<T>, id: NodeId) {
    let node = tree.get(id);
    let (left, right) = (node.left, node.right);

    let (left_contour, right_contour) = match (left, right) {
        (None, None) => (Contour::single(0), Contour::single(0)),
        (Some(only), None) | (None, Some(only)) => {
            let offset = if left.is_some() { -1 } else { 1 };
            tree.get_mut(only).relative_x = offset;
            let child = tree.get(only);
            (
                Contour::stacked(0, &child.left_contour, offset, None),
                Contour::stacked(0, &child.right_contour, offset, None),
            )
        }
        (Some(l), Some(r)) => {
            let (lc, rc) = (tree.get(l), tree.get(r));
            // Both children still sit on the parent's column here
            let gap = min_gap(&lc.right_contour, &rc.left_contour).unwrap_or(0);
            let half = if gap <= 0 { spread_columns(gap) / 2 } else { 0 };
            let contours = (
                Contour::stacked(0, &lc.left_contour, -half, Some((&rc.left_contour, half))),
                Contour::stacked(0, &rc.right_contour, half, Some((&lc.right_contour, -half))),
            );
            tree.get_mut(l).relative_x = -half;
            tree.get_mut(r).relative_x = half;
            contours
        }
    };

    let node = tree.get_mut(id);
    node.left_contour = left_contour;
    node.right_contour = right_contour;
}

/// Total columns to move two overlapping subtrees apart, given the smallest
/// gap between them. Always even, and always enough to leave a gap of at
/// least one column.
fn spread_columns(gap: i64) -> i64 {
    let required = 1 - gap;
    if required % 2 == 0 {
        required + 2
    } else {
        required + 1
    }
}
