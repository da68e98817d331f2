//! Tree data structures.
//!
//! Trees are arenas of nodes addressed by [`NodeId`]. Parent links are plain
//! ids, never owning references. Two shapes are provided:
//! - [`Tree`]: ordered children of arbitrary width
//! - [`BinaryTree`]: named left/right slots

mod binary;
mod builder;
mod general;
mod node;
pub mod traverse;

pub use binary::{BinaryNode, BinaryTree};
pub use general::Tree;
pub use node::{Node, NodeId};
pub use traverse::{Hierarchy, Positioned};

/// One of the two horizontal directions: a binary child slot, or which
/// outline of a subtree a contour follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}
