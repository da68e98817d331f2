//! Projection of finished layouts into render coordinates.
//!
//! Layout always happens top-down with `x` across and `y` down the levels.
//! The projection maps those coordinates per [`CoordinateMode`]:
//! - `TopDown`: unchanged
//! - `LeftToRight`: axes swapped, so depth grows to the right
//! - `Radial`: `x` becomes an angle around the full circle and `y` a radius,
//!   which puts the root at the origin

use std::f64::consts::TAU;

use super::{CoordinateMode, LayoutConfig, Placement};
use crate::error::Result;
use crate::tree::Positioned;
use crate::tree::traverse;

/// Project every node reachable from the root, in preorder.
pub fn project<P: Positioned>(tree: &P, config: &LayoutConfig) -> Result<Vec<Placement>> {
    let order = traverse::preorder(tree)?;
    let positions = order.iter().map(|&id| (id, tree.position(id)));

    let placements = match config.coordinate_mode {
        CoordinateMode::TopDown => positions
            .map(|(id, (x, y))| Placement::new(id, x, y))
            .collect(),
        CoordinateMode::LeftToRight => positions
            .map(|(id, (x, y))| Placement::new(id, y, x))
            .collect(),
        CoordinateMode::Radial => {
            let (min_x, max_x) = order
                .iter()
                .map(|&id| tree.position(id).0)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                    (lo.min(x), hi.max(x))
                });
            // One extra distance keeps the first and last column from meeting
            let angular_scale = TAU / ((max_x - min_x).max(0.0) + config.min_horizontal_distance);
            positions
                .map(|(id, (x, y))| {
                    let angle = (x - min_x) * angular_scale;
                    Placement::new(id, y * angle.cos(), y * angle.sin())
                })
                .collect()
        }
    };
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TidyTreeLayout;
    use crate::tree::{NodeId, Tree};

    fn laid_out() -> (Tree<&'static str>, [NodeId; 3]) {
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let l = tree.add_child(root, "l").unwrap();
        let r = tree.add_child(root, "r").unwrap();
        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        (tree, [root, l, r])
    }

    fn find(placements: &[Placement], id: NodeId) -> (f64, f64) {
        let p = placements.iter().find(|p| p.id == id).unwrap();
        (p.x, p.y)
    }

    #[test]
    fn test_top_down_is_identity() {
        let (tree, [root, l, r]) = laid_out();
        let placements = project(&tree, &LayoutConfig::default()).unwrap();
        assert_eq!(placements.len(), 3);
        assert_eq!(placements[0].id, root);
        assert_eq!(find(&placements, l), (0.0, 1.0));
        assert_eq!(find(&placements, r), (1.0, 1.0));
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let (tree, [root, _, r]) = laid_out();
        let config = LayoutConfig::default().coordinate_mode(CoordinateMode::LeftToRight);
        let placements = project(&tree, &config).unwrap();
        assert_eq!(find(&placements, root), (0.0, 0.5));
        assert_eq!(find(&placements, r), (1.0, 1.0));
    }

    #[test]
    fn test_radial_puts_root_at_origin() {
        let (tree, [root, l, r]) = laid_out();
        let config = LayoutConfig::default().coordinate_mode(CoordinateMode::Radial);
        let placements = project(&tree, &config).unwrap();

        let (rx, ry) = find(&placements, root);
        assert!(rx.abs() < 1e-12 && ry.abs() < 1e-12);
        // Leaves sit at radius 1: l at angle 0, r half way round
        let (lx, ly) = find(&placements, l);
        assert!((lx - 1.0).abs() < 1e-12 && ly.abs() < 1e-12);
        let (x, y) = find(&placements, r);
        assert!((x + 1.0).abs() < 1e-12 && y.abs() < 1e-12);
    }

    #[test]
    fn test_radial_single_node() {
        let mut tree = Tree::new();
        tree.add_root("only").unwrap();
        TidyTreeLayout::with_defaults().layout(&mut tree).unwrap();
        let config = LayoutConfig::default().coordinate_mode(CoordinateMode::Radial);
        let placements = project(&tree, &config).unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!((placements[0].x, placements[0].y), (0.0, 0.0));
    }

    #[test]
    fn test_empty_tree() {
        let tree: Tree<()> = Tree::new();
        assert!(project(&tree, &LayoutConfig::default()).unwrap().is_empty());
    }
}
