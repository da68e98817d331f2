//! Binary tree stored in an arena.
//!
//! Each node has a named `left` and `right` slot. Nodes may be created
//! detached and attached later; attachment is validated so the arena can only
//! ever hold a forest of proper trees.

use std::collections::BTreeMap;
use std::fmt;

use super::Side;
use super::node::NodeId;
use super::traverse::{Hierarchy, Positioned};
use crate::error::{LayoutError, Result};
use crate::layout::contour::Contour;
use crate::layout::{LayoutConfig, Placement, Point, projection};

/// A node of a binary tree.
#[derive(Debug, Clone)]
pub struct BinaryNode<T> {
    value: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) depth: u32,
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Offset from the parent, in columns. Fixed by the parent during layout.
    pub(crate) relative_x: i64,
    /// Leftmost column per relative depth, relative to this node.
    pub(crate) left_contour: Contour<i64>,
    /// Rightmost column per relative depth, relative to this node.
    pub(crate) right_contour: Contour<i64>,
}

impl<T> BinaryNode<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            parent: None,
            left: None,
            right: None,
            depth: 0,
            x: 0.0,
            y: 0.0,
            relative_x: 0,
            left_contour: Contour::single(0),
            right_contour: Contour::single(0),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn relative_x(&self) -> i64 {
        self.relative_x
    }

    pub fn left_contour(&self) -> &Contour<i64> {
        &self.left_contour
    }

    pub fn right_contour(&self) -> &Contour<i64> {
        &self.right_contour
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// A rooted binary tree.
#[derive(Debug, Clone)]
pub struct BinaryTree<T> {
    nodes: Vec<BinaryNode<T>>,
    root: Option<NodeId>,
}

impl<T> BinaryTree<T> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create a detached node. It takes part in layout once it is the root
    /// or attached below it.
    pub fn add_node(&mut self, value: T) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(BinaryNode::new(value));
        id
    }

    /// Create a node and make it the root.
    pub fn add_root(&mut self, value: T) -> Result<NodeId> {
        if let Some(root) = self.root {
            return Err(LayoutError::invalid_argument(format!(
                "tree already has a root ({root})"
            )));
        }
        let id = self.add_node(value);
        self.root = Some(id);
        Ok(id)
    }

    /// Make an existing detached node the root.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        if let Some(root) = self.root {
            return Err(LayoutError::invalid_argument(format!(
                "tree already has a root ({root})"
            )));
        }
        if self.checked(id)?.parent.is_some() {
            return Err(LayoutError::invalid_argument(format!(
                "{id} already has a parent and cannot be the root"
            )));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Create a node as the left child of `parent`.
    pub fn add_left(&mut self, parent: NodeId, value: T) -> Result<NodeId> {
        self.add_child(parent, Side::Left, value)
    }

    /// Create a node as the right child of `parent`.
    pub fn add_right(&mut self, parent: NodeId, value: T) -> Result<NodeId> {
        self.add_child(parent, Side::Right, value)
    }

    fn add_child(&mut self, parent: NodeId, side: Side, value: T) -> Result<NodeId> {
        self.check_free_slot(parent, side)?;
        let child = self.add_node(value);
        self.attach(parent, side, child)?;
        Ok(child)
    }

    /// Attach the detached node `child` into `parent`'s `side` slot.
    ///
    /// Rejects unknown ids, occupied slots, children that already have a
    /// parent or are the root, and attachments that would close a cycle.
    pub fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) -> Result<()> {
        self.check_free_slot(parent, side)?;
        if self.checked(child)?.parent.is_some() {
            return Err(LayoutError::invalid_argument(format!(
                "{child} already has a parent"
            )));
        }
        if self.root == Some(child) {
            return Err(LayoutError::invalid_argument(format!(
                "the root {child} cannot become a child"
            )));
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(LayoutError::invalid_argument(format!(
                    "attaching {child} below {parent} would create a cycle"
                )));
            }
            ancestor = self.nodes[current.index()].parent;
        }

        *self.nodes[parent.index()].slot_mut(side) = Some(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    fn check_free_slot(&self, parent: NodeId, side: Side) -> Result<()> {
        if let Some(existing) = self.checked(parent)?.child(side) {
            return Err(LayoutError::invalid_argument(format!(
                "{side:?} slot of {parent} is already taken by {existing}"
            )));
        }
        Ok(())
    }

    fn checked(&self, id: NodeId) -> Result<&BinaryNode<T>> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| LayoutError::invalid_argument(format!("unknown node {id}")))
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&BinaryNode<T>> {
        self.nodes.get(id.index())
    }

    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(BinaryNode::value)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(BinaryNode::left)
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(BinaryNode::right)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(BinaryNode::parent)
    }

    /// The left-right mirror image: every node's slots swapped. Ids are kept
    /// and layout fields are cleared.
    pub fn mirrored(&self) -> Self
    where
        T: Clone,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                let mut mirror = BinaryNode::new(node.value.clone());
                mirror.parent = node.parent;
                mirror.left = node.right;
                mirror.right = node.left;
                mirror
            })
            .collect();
        Self {
            nodes,
            root: self.root,
        }
    }

    /// Final positions of every node reachable from the root.
    pub fn placements(&self, config: &LayoutConfig) -> Result<Vec<Placement>> {
        projection::project(self, config)
    }

    /// Final positions keyed by value.
    pub fn coordinates(&self, config: &LayoutConfig) -> Result<BTreeMap<T, Point>>
    where
        T: Ord + Clone,
    {
        Ok(self
            .placements(config)?
            .into_iter()
            .filter_map(|p| self.value(p.id).map(|value| (value.clone(), p.point())))
            .collect())
    }

    pub(crate) fn get(&self, id: NodeId) -> &BinaryNode<T> {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut BinaryNode<T> {
        &mut self.nodes[id.index()]
    }
}

impl BinaryTree<u32> {
    /// Build a tree from parallel child-slot arrays: node `i` has left child
    /// `left[i]` and right child `right[i]`, with `u32::MAX` meaning "none".
    /// Node values are their indices.
    pub fn from_child_slots(left: &[u32], right: &[u32], root: u32) -> Result<Self> {
        if left.len() != right.len() {
            return Err(LayoutError::invalid_argument(format!(
                "child slot arrays differ in length ({} vs {})",
                left.len(),
                right.len()
            )));
        }
        let mut tree = Self::new();
        for value in 0..left.len() as u32 {
            tree.add_node(value);
        }
        for (side, slots) in [(Side::Left, left), (Side::Right, right)] {
            for (parent, &child) in slots.iter().enumerate() {
                if child != u32::MAX {
                    tree.attach(NodeId::from_index(parent), side, NodeId(child))?;
                }
            }
        }
        if !left.is_empty() {
            tree.set_root(NodeId(root))?;
        }
        Ok(tree)
    }
}

impl<T> Default for BinaryTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Hierarchy for BinaryTree<T> {
    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id)
    }

    fn children_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = self.node(id);
        [node.and_then(BinaryNode::left), node.and_then(BinaryNode::right)]
            .into_iter()
            .flatten()
    }
}

impl<T> Positioned for BinaryTree<T> {
    fn position(&self, id: NodeId) -> (f64, f64) {
        let node = self.get(id);
        (node.x, node.y)
    }

    fn depth_of(&self, id: NodeId) -> u32 {
        self.get(id).depth
    }
}

/// Indented dump: one `-> value (x, y)` line per node, left child first.
impl<T: fmt::Display> fmt::Display for BinaryTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, indent)) = stack.pop() {
            let node = self.get(id);
            writeln!(f, "{:indent$}-> {} ({}, {})", "", node.value, node.x, node.y)?;
            stack.extend(
                [node.right, node.left]
                    .into_iter()
                    .flatten()
                    .map(|c| (c, indent + 4)),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_slots() {
        let mut tree = BinaryTree::new();
        let root = tree.add_root(8).unwrap();
        let l = tree.add_left(root, 3).unwrap();
        let r = tree.add_right(root, 10).unwrap();
        let lr = tree.add_right(l, 6).unwrap();

        assert_eq!(tree.left(root), Some(l));
        assert_eq!(tree.right(root), Some(r));
        assert_eq!(tree.right(l), Some(lr));
        assert_eq!(tree.left(l), None);
        assert_eq!(tree.parent(lr), Some(l));
        assert_eq!(tree.value(r), Some(&10));
        assert_eq!(tree.children_of(root).collect::<Vec<_>>(), vec![l, r]);
        assert_eq!(tree.children_of(l).collect::<Vec<_>>(), vec![lr]);
    }

    #[test]
    fn test_occupied_slot_rejected() {
        let mut tree = BinaryTree::new();
        let root = tree.add_root(1).unwrap();
        tree.add_left(root, 0).unwrap();
        let before = tree.len();
        assert!(matches!(
            tree.add_left(root, 2),
            Err(LayoutError::InvalidArgument { .. })
        ));
        assert_eq!(tree.len(), before, "no node is created on failure");
    }

    #[test]
    fn test_attach_rejects_node_with_parent() {
        let mut tree = BinaryTree::new();
        let root = tree.add_root(0).unwrap();
        let a = tree.add_left(root, 1).unwrap();
        assert!(matches!(
            tree.attach(root, Side::Right, a),
            Err(LayoutError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_attach_rejects_root_and_cycles() {
        let mut tree = BinaryTree::new();
        let root = tree.add_root(0).unwrap();
        let a = tree.add_left(root, 1).unwrap();
        assert!(tree.attach(a, Side::Left, root).is_err());

        // Detached pair: b → c, then try to hang b below c
        let b = tree.add_node(2);
        let c = tree.add_node(3);
        tree.attach(b, Side::Left, c).unwrap();
        assert!(matches!(
            tree.attach(c, Side::Right, b),
            Err(LayoutError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_attach_rejects_unknown_ids() {
        let mut tree: BinaryTree<u8> = BinaryTree::new();
        let root = tree.add_root(0).unwrap();
        assert!(tree.attach(root, Side::Left, NodeId(9)).is_err());
        assert!(tree.attach(NodeId(9), Side::Left, root).is_err());
    }

    #[test]
    fn test_from_child_slots() {
        // 0 → (1, 2), 1 → (_, 3)
        let none = u32::MAX;
        let tree =
            BinaryTree::from_child_slots(&[1, none, none, none], &[2, 3, none, none], 0).unwrap();
        assert_eq!(tree.root(), Some(NodeId(0)));
        assert_eq!(tree.left(NodeId(0)), Some(NodeId(1)));
        assert_eq!(tree.right(NodeId(0)), Some(NodeId(2)));
        assert_eq!(tree.right(NodeId(1)), Some(NodeId(3)));
        assert_eq!(tree.parent(NodeId(3)), Some(NodeId(1)));
    }

    #[test]
    fn test_from_child_slots_rejects_bad_input() {
        let none = u32::MAX;
        assert!(BinaryTree::from_child_slots(&[1], &[none, none], 0).is_err());
        // Node 1 claimed by two parents
        assert!(BinaryTree::from_child_slots(&[1, none], &[1, none], 0).is_err());
        // Root that is somebody's child
        assert!(BinaryTree::from_child_slots(&[1, none], &[none, none], 1).is_err());
    }

    #[test]
    fn test_mirrored_swaps_slots() {
        let mut tree = BinaryTree::new();
        let root = tree.add_root('m').unwrap();
        let l = tree.add_left(root, 'l').unwrap();
        let ll = tree.add_left(l, 'k').unwrap();
        let mirror = tree.mirrored();
        assert_eq!(mirror.right(root), Some(l));
        assert_eq!(mirror.left(root), None);
        assert_eq!(mirror.right(l), Some(ll));
    }
}
