//! Node identifiers and the general (n-ary) node record.
//!
//! Every node lives in an arena and is addressed by a [`NodeId`]. A node
//! carries:
//! - A label (opaque payload, never interpreted by the layout)
//! - Its ordered children and a non-owning link to its parent
//! - Layout fields: depth, position (x, y) and the deferred offset `modifier`

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
///
/// The identifier is an index into the owning tree's arena. It wraps a u32
/// for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Position of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A node of a general tree.
#[derive(Debug, Clone)]
pub struct Node<L> {
    label: L,
    pub(crate) parent: Option<NodeId>,
    /// Ordered left to right; never reordered by layout.
    pub(crate) children: Vec<NodeId>,
    /// Left-to-right index among siblings.
    pub(crate) number: usize,
    pub(crate) depth: u32,
    pub(crate) x: f64,
    pub(crate) y: f64,
    /// Horizontal amount still owed to every descendant of this node.
    pub(crate) modifier: f64,
}

impl<L> Node<L> {
    pub(crate) fn new(label: L, parent: Option<NodeId>, number: usize) -> Self {
        Self {
            label,
            parent,
            children: Vec::new(),
            number,
            depth: 0,
            x: 0.0,
            y: 0.0,
            modifier: 0.0,
        }
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Depth below the root (root = 0). Set by the depth pass.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Horizontal coordinate. Provisional until layout has finalized it.
    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Deferred offset. Zero on every node once layout has completed.
    pub fn modifier(&self) -> f64 {
        self.modifier
    }

    pub(crate) fn map_label<M>(self, f: impl FnOnce(L) -> M) -> Node<M> {
        Node {
            label: f(self.label),
            parent: self.parent,
            children: self.children,
            number: self.number,
            depth: self.depth,
            x: self.x,
            y: self.y,
            modifier: self.modifier,
        }
    }

    pub(crate) fn reset_layout(&mut self) {
        self.depth = 0;
        self.x = 0.0;
        self.y = 0.0;
        self.modifier = 0.0;
    }
}
