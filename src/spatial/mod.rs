//! Spatial indexing for hit testing on a finished layout.
//!
//! An R-tree over node placements answers nearest-node and range queries in
//! O(log n), so a renderer can map pointer positions back to nodes.

mod rtree;

pub use rtree::{NodePoint, SpatialIndex};
