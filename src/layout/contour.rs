//! Subtree contours.
//!
//! A contour lists, per relative depth below a subtree root, the extreme
//! horizontal position reached at that depth: the minimum for a left contour,
//! the maximum for a right contour. Two sibling subtrees are separated
//! correctly when, at every depth they share, the right neighbour's left
//! contour stays at least one minimum distance right of the left neighbour's
//! right contour.
//!
//! General trees extract contours on demand from provisional positions,
//! folding in pending `modifier` offsets along the way. Binary trees cache
//! one contour pair per node and compose it from the children's pairs.

use std::ops::{Add, Sub};

use crate::tree::{NodeId, Side, Tree};

/// Numeric type a contour can hold: `f64` for general trees, `i64` columns
/// for binary trees.
pub trait Coordinate: Copy + PartialOrd + Add<Output = Self> + Sub<Output = Self> {}

impl<T> Coordinate for T where T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T> {}

/// Extreme positions of a subtree, indexed by relative depth (0 = subtree root).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour<T = f64> {
    levels: Vec<T>,
}

impl<T: Coordinate> Contour<T> {
    /// Contour of a lone node.
    pub fn single(position: T) -> Self {
        Self {
            levels: vec![position],
        }
    }

    pub fn from_levels(levels: Vec<T>) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> &[T] {
        &self.levels
    }

    /// Number of depth levels covered.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<T> {
        self.levels.get(depth).copied()
    }

    /// Smallest level, or `None` for an empty contour.
    pub fn min(&self) -> Option<T> {
        self.levels
            .iter()
            .copied()
            .reduce(|a, b| if b < a { b } else { a })
    }

    pub fn shifted(&self, by: T) -> Self {
        Self {
            levels: self.levels.iter().map(|&level| level + by).collect(),
        }
    }

    pub fn shift(&mut self, by: T) {
        for level in &mut self.levels {
            *level = *level + by;
        }
    }

    /// Contour of a node at `origin` whose children have contours `near` and
    /// (optionally) `far`, each offset from the node.
    ///
    /// `near` is the child on the side this contour follows; it supplies every
    /// level it covers. `far` only contributes the levels below `near`'s
    /// deepest one.
    pub fn stacked(origin: T, near: &Self, near_offset: T, far: Option<(&Self, T)>) -> Self {
        let mut levels = Vec::with_capacity(1 + near.len().max(far.map_or(0, |(f, _)| f.len())));
        levels.push(origin);
        levels.extend(near.levels.iter().map(|&level| level + near_offset));
        if let Some((far, far_offset)) = far {
            levels.extend(
                far.levels
                    .iter()
                    .skip(near.len())
                    .map(|&level| level + far_offset),
            );
        }
        Self { levels }
    }
}

/// Smallest horizontal gap between a left subtree and a right subtree over
/// the depths both cover: `min(right_side[i] - left_side[i])`.
///
/// `left_side` is the right contour of the left subtree and `right_side` the
/// left contour of the right subtree. `None` if they share no depth.
pub fn min_gap<T: Coordinate>(left_side: &Contour<T>, right_side: &Contour<T>) -> Option<T> {
    left_side
        .levels
        .iter()
        .zip(&right_side.levels)
        .map(|(&l, &r)| r - l)
        .reduce(|a, b| if b < a { b } else { a })
}

/// Leftmost provisional position per relative depth of `id`'s subtree.
pub fn left_contour<L>(tree: &Tree<L>, id: NodeId) -> Contour {
    extract(tree, id, Side::Left)
}

/// Rightmost provisional position per relative depth of `id`'s subtree.
pub fn right_contour<L>(tree: &Tree<L>, id: NodeId) -> Contour {
    extract(tree, id, Side::Right)
}

fn extract<L>(tree: &Tree<L>, id: NodeId, side: Side) -> Contour {
    let mut levels: Vec<f64> = Vec::new();
    // (node, relative depth, modifiers owed by ancestors below `id`)
    let mut stack = vec![(id, 0usize, 0.0f64)];

    while let Some((node_id, depth, owed)) = stack.pop() {
        let node = tree.get(node_id);
        let position = node.x + owed;
        match levels.get_mut(depth) {
            None => levels.push(position),
            Some(level) => {
                let further = match side {
                    Side::Left => position < *level,
                    Side::Right => position > *level,
                };
                if further {
                    *level = position;
                }
            }
        }
        let child_owed = owed + node.modifier;
        stack.extend(node.children.iter().map(|&c| (c, depth + 1, child_owed)));
    }
    Contour::from_levels(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_contour() {
        let contour = Contour::single(3i64);
        assert_eq!(contour.len(), 1);
        assert_eq!(contour.get(0), Some(3));
        assert_eq!(contour.get(1), None);
        assert_eq!(contour.min(), Some(3));
    }

    #[test]
    fn test_shift() {
        let mut contour = Contour::from_levels(vec![0.0, -1.0, 2.0]);
        assert_eq!(contour.shifted(1.5).levels(), &[1.5, 0.5, 3.5]);
        contour.shift(-1.0);
        assert_eq!(contour.levels(), &[-1.0, -2.0, 1.0]);
        assert_eq!(contour.min(), Some(-2.0));
    }

    #[test]
    fn test_stacked_extends_with_far_side() {
        let near = Contour::from_levels(vec![0i64, -1]);
        let far = Contour::from_levels(vec![0i64, 1, 2, 3]);
        let merged = Contour::stacked(0, &near, -2, Some((&far, 2)));
        // origin, near levels shifted by -2, then far's deeper levels shifted by 2
        assert_eq!(merged.levels(), &[0, -2, -3, 4, 5]);

        let lone = Contour::stacked(0, &near, 1, None);
        assert_eq!(lone.levels(), &[0, 1, 0]);
    }

    #[test]
    fn test_min_gap_bounded_by_shorter_contour() {
        let left = Contour::from_levels(vec![0.0, 1.0, 5.0]);
        let right = Contour::from_levels(vec![2.0, 1.5]);
        assert_eq!(min_gap(&left, &right), Some(0.5));
        assert_eq!(min_gap(&left, &Contour::default()), None);
    }

    #[test]
    fn test_extract_folds_pending_modifiers() {
        // root → (a → (c, d), b)
        let mut tree = Tree::new();
        let root = tree.add_root("root").unwrap();
        let a = tree.add_child(root, "a").unwrap();
        let b = tree.add_child(root, "b").unwrap();
        let c = tree.add_child(a, "c").unwrap();
        let d = tree.add_child(a, "d").unwrap();
        tree.get_mut(a).x = 1.0;
        tree.get_mut(a).modifier = 2.0;
        tree.get_mut(b).x = 3.0;
        tree.get_mut(c).x = 0.0;
        tree.get_mut(d).x = 1.0;

        let left = left_contour(&tree, root);
        assert_eq!(left.levels(), &[0.0, 1.0, 2.0]);
        let right = right_contour(&tree, root);
        assert_eq!(right.levels(), &[0.0, 3.0, 3.0]);

        // A node's own modifier applies to its descendants only
        assert_eq!(left_contour(&tree, a).levels(), &[1.0, 2.0]);
        assert_eq!(right_contour(&tree, b).levels(), &[3.0]);
    }
}
