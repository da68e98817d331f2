//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries over laid-out nodes for:
//! - Nearest neighbor
//! - Point-in-radius
//! - Rectangle intersection

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::Placement;
use crate::tree::NodeId;

/// A laid-out node as stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

impl NodePoint {
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

impl From<&Placement> for NodePoint {
    fn from(placement: &Placement) -> Self {
        Self::new(placement.id, placement.x, placement.y)
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.x == point[0] && self.y == point[1]
    }
}

/// Spatial index over the placements of one layout.
///
/// Uses an R*-tree. Rebuilt wholesale after every layout, since a layout run
/// can move every node.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk load an index from layout output.
    pub fn from_placements(placements: &[Placement]) -> Self {
        Self {
            tree: RTree::bulk_load(placements.iter().map(NodePoint::from).collect()),
        }
    }

    /// Replace the contents of the index with `placements`.
    pub fn rebuild(&mut self, placements: &[Placement]) {
        *self = Self::from_placements(placements);
    }

    /// Find the nearest node to a point.
    pub fn nearest(&self, x: f64, y: f64) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| point.id)
    }

    /// Find the nearest node within a maximum distance.
    pub fn nearest_within(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.id)
    }

    /// Find all nodes within a rectangle, in no particular order.
    pub fn in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<NodeId> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope(&envelope)
            .map(|point| point.id)
            .collect()
    }

    /// Find all nodes within a radius of a point, in no particular order.
    pub fn in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<NodeId> {
        self.tree
            .locate_within_distance([x, y], radius * radius)
            .map(|point| point.id)
            .collect()
    }

    /// Nodes sharing a position with another node. Empty for a valid layout.
    pub fn coincident(&self) -> Vec<NodeId> {
        self.tree
            .iter()
            .filter(|point| {
                self.tree
                    .locate_all_at_point(&[point.x, point.y])
                    .nth(1)
                    .is_some()
            })
            .map(|point| point.id)
            .collect()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
