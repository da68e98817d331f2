//! General (n-ary) tree stored in an arena.
//!
//! Nodes are only ever appended, so every node is reachable from the root and
//! a `NodeId` handed out by this tree stays valid for its whole lifetime.

use std::collections::BTreeMap;
use std::fmt;

use super::node::{Node, NodeId};
use super::traverse::{self, Hierarchy, Positioned};
use crate::error::{LayoutError, Result};
use crate::layout::{LayoutConfig, Placement, Point, projection};

/// An ordered rooted tree with arbitrary fan-out.
#[derive(Debug, Clone)]
pub struct Tree<L> {
    nodes: Vec<Node<L>>,
    root: Option<NodeId>,
}

impl<L> Tree<L> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Add the root node. Fails if the tree already has one.
    pub fn add_root(&mut self, label: L) -> Result<NodeId> {
        if let Some(root) = self.root {
            return Err(LayoutError::invalid_argument(format!(
                "tree already has a root ({root})"
            )));
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(label, None, 0));
        self.root = Some(id);
        Ok(id)
    }

    /// Append a child to the right of `parent`'s existing children.
    pub fn add_child(&mut self, parent: NodeId, label: L) -> Result<NodeId> {
        let id = NodeId::from_index(self.nodes.len());
        let siblings = &mut self
            .nodes
            .get_mut(parent.index())
            .ok_or_else(|| LayoutError::invalid_argument(format!("unknown parent {parent}")))?
            .children;
        let number = siblings.len();
        siblings.push(id);
        self.nodes.push(Node::new(label, Some(parent), number));
        Ok(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<L>> {
        self.nodes.get(id.index())
    }

    pub fn label(&self, id: NodeId) -> Option<&L> {
        self.node(id).map(Node::label)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Children of `id`, left to right. Empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Iterate over every node with its id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<L>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId::from_index(index), node))
    }

    // =========================================================================
    // Sibling helpers
    // =========================================================================

    /// All children of `id`'s parent, including `id`. Empty for the root.
    pub fn siblings(&self, id: NodeId) -> &[NodeId] {
        self.parent(id).map(|p| self.children(p)).unwrap_or(&[])
    }

    /// Siblings strictly left of `id`, leftmost first.
    pub fn earlier_siblings(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => {
                let siblings = self.siblings(id);
                &siblings[..node.number.min(siblings.len())]
            }
            None => &[],
        }
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.earlier_siblings(id).last().copied()
    }

    /// True for the first child of its parent and for the root.
    pub fn is_leftmost(&self, id: NodeId) -> bool {
        self.node(id).is_none_or(|node| node.number == 0)
    }

    /// True for the last child of its parent and for the root.
    pub fn is_rightmost(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) if node.parent.is_some() => node.number + 1 == self.siblings(id).len(),
            _ => true,
        }
    }

    /// Every descendant of `id` in preorder, excluding `id` itself.
    pub fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>> {
        traverse::descendants(self, id)
    }

    // =========================================================================
    // Derived trees
    // =========================================================================

    /// Rebuild the tree with every label passed through `f`. Ids are kept.
    pub fn map_labels<M>(self, mut f: impl FnMut(L) -> M) -> Tree<M> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| node.map_label(&mut f))
            .collect();
        Tree {
            nodes,
            root: self.root,
        }
    }

    /// The left-right mirror image: every child list reversed. Ids are kept
    /// and layout fields are cleared.
    pub fn mirrored(&self) -> Self
    where
        L: Clone,
    {
        let mut mirror = self.clone();
        for node in &mut mirror.nodes {
            node.children.reverse();
            node.reset_layout();
        }
        for index in 0..mirror.nodes.len() {
            let children = mirror.nodes[index].children.clone();
            for (number, child) in children.into_iter().enumerate() {
                mirror.nodes[child.index()].number = number;
            }
        }
        mirror
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Final positions of every node, projected per `config.coordinate_mode`.
    pub fn placements(&self, config: &LayoutConfig) -> Result<Vec<Placement>> {
        projection::project(self, config)
    }

    /// Final positions keyed by label.
    pub fn coordinates(&self, config: &LayoutConfig) -> Result<BTreeMap<L, Point>>
    where
        L: Ord + Clone,
    {
        Ok(self
            .placements(config)?
            .into_iter()
            .filter_map(|p| self.label(p.id).map(|label| (label.clone(), p.point())))
            .collect())
    }

    // =========================================================================
    // Crate-internal mutation for the layout passes
    // =========================================================================

    pub(crate) fn get(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<L> {
        &mut self.nodes[id.index()]
    }

    /// Move `id` and, lazily, everything beneath it.
    pub(crate) fn shift_subtree(&mut self, id: NodeId, by: f64) {
        let node = self.get_mut(id);
        node.x += by;
        node.modifier += by;
    }
}

impl<L> Default for Tree<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Hierarchy for Tree<L> {
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
        self.children(id).iter().copied()
    }
}

impl<L> Positioned for Tree<L> {
    fn position(&self, id: NodeId) -> (f64, f64) {
        let node = self.get(id);
        (node.x, node.y)
    }

    fn depth_of(&self, id: NodeId) -> u32 {
        self.get(id).depth
    }
}

/// Indented dump: one `label (x, y) mod=m` line per node.
impl<L: fmt::Display> fmt::Display for Tree<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };
        let mut stack = vec![(root, 0usize)];
        while let Some((id, indent)) = stack.pop() {
            let node = self.get(id);
            writeln!(
                f,
                "{:indent$}{} ({}, {}) mod={}",
                "",
                node.label(),
                node.x,
                node.y,
                node.modifier
            )?;
            stack.extend(node.children.iter().rev().map(|&c| (c, indent + 1)));
        }
        Ok(())
    }
}
