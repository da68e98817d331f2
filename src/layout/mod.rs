//! Tidy tree layout algorithms.
//!
//! This module computes layered, non-overlapping drawings of rooted trees:
//! [`TidyTreeLayout`] for trees of any fan-out and [`BinaryTreeLayout`] for
//! binary trees. Both write positions into the tree's nodes; [`projection`]
//! turns them into render coordinates.

pub mod binary;
pub mod config;
pub mod contour;
mod depth;
mod equalize;
mod finalize;
mod position;
pub mod projection;
pub mod tidy_tree;

use serde::Serialize;

pub use binary::BinaryTreeLayout;
pub use config::{CoordinateMode, LayoutConfig};
pub use contour::Contour;
pub use tidy_tree::TidyTreeLayout;

use crate::tree::NodeId;

/// A point in render space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Final render position of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl Placement {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

/// Summary of one layout run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    /// Nodes reachable from the root, all of which were placed.
    pub nodes: usize,
    /// Nodes whose conflict resolution hit its pass limit.
    pub unconverged: usize,
    /// Amount the whole tree was moved right by normalization.
    pub normalization_shift: f64,
}
