//! Tidy Tree - WASM Module
//!
//! Layered, non-overlapping layouts for rooted trees, compiled to
//! WebAssembly and exposed to JavaScript via wasm-bindgen. The same crate is
//! usable natively as a plain Rust library.
//!
//! # Architecture
//!
//! - `tree`: arena-backed general and binary trees, builders and traversals
//! - `layout`: the tidy layout passes for both tree variants, plus projection
//!   into top-down, left-to-right or radial coordinates
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing on a layout
//! - `logging`: `log` backend forwarding to the browser console
//! - `error`: error types shared by all of the above

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod layout;
pub mod logging;
pub mod spatial;
pub mod tree;

pub use error::{LayoutError, Result, StructuralError};
pub use layout::{
    BinaryTreeLayout, CoordinateMode, LayoutConfig, LayoutStats, Placement, Point, TidyTreeLayout,
};
pub use tree::{BinaryTree, NodeId, Tree};

use spatial::SpatialIndex;

/// Marks a slot that is not part of the laid-out tree in position arrays.
/// Consumers check `x >= SENTINEL`.
pub const SENTINEL: f32 = f32::MAX;

/// "No node" in slot-typed JS arguments.
const NO_SLOT: u32 = u32::MAX;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init_logging(logging::DEFAULT_LEVEL);
}

/// Change the console log level (`"off"`, `"error"`, ..., `"trace"`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> std::result::Result<(), JsError> {
    let filter = logging::parse_level(level)
        .ok_or_else(|| JsError::new(&format!("unknown log level {level:?}")))?;
    logging::init_logging(filter);
    Ok(())
}

/// Read layout options from a JS object; `undefined` or `null` means defaults.
fn config_from_js(options: JsValue) -> std::result::Result<LayoutConfig, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(LayoutConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(options)?)
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

/// Flatten placements into `[x0, y0, x1, y1, ...]` with one pair per slot.
/// Slots without a placement hold `SENTINEL`.
fn interleave(
    placements: &[Placement],
    slot_count: usize,
    slot_of: impl Fn(NodeId) -> Option<usize>,
) -> Vec<f32> {
    let mut positions = vec![SENTINEL; slot_count * 2];
    for placement in placements {
        if let Some(slot) = slot_of(placement.id).filter(|&slot| slot < slot_count) {
            positions[slot * 2] = placement.x as f32;
            positions[slot * 2 + 1] = placement.y as f32;
        }
    }
    positions
}

/// Main entry point for laying out general trees from JavaScript.
///
/// Nodes are addressed from JS by slot numbers. Nodes added one at a time
/// get consecutive slots; `loadEdges` uses the slots named in its edge list.
#[wasm_bindgen]
pub struct TreeLayoutWasm {
    tree: Tree<String>,
    /// Slot of every arena node.
    slot_of_node: Vec<u32>,
    /// Arena node of every slot, if it is part of the tree.
    node_of_slot: Vec<Option<NodeId>>,
    placements: Vec<Placement>,
    index: SpatialIndex,
}

#[wasm_bindgen]
impl TreeLayoutWasm {
    /// Create a new empty tree.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            slot_of_node: Vec::new(),
            node_of_slot: Vec::new(),
            placements: Vec::new(),
            index: SpatialIndex::new(),
        }
    }

    // =========================================================================
    // Tree Construction
    // =========================================================================

    /// Add the root node. Returns its slot.
    #[wasm_bindgen(js_name = addRoot)]
    pub fn add_root(&mut self, label: String) -> std::result::Result<u32, JsError> {
        Ok(self.push_root(label)?)
    }

    /// Append a child to the node in `parent` slot. Returns the child's slot.
    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self, parent: u32, label: String) -> std::result::Result<u32, JsError> {
        Ok(self.push_child(parent, label)?)
    }

    /// Replace the tree with one built from `[parent0, child0, ...]` edge
    /// pairs over slots `0..nodeCount`. Labels are the slot numbers.
    ///
    /// `root` of `0xFFFFFFFF` auto-detects the root. Returns the number of
    /// nodes in the tree.
    #[wasm_bindgen(js_name = loadEdges)]
    pub fn load_edges(
        &mut self,
        node_count: u32,
        edges: &[u32],
        root: u32,
    ) -> std::result::Result<u32, JsError> {
        let root = (root != NO_SLOT).then_some(root);
        Ok(self.replace_from_edges(node_count as usize, edges, root)?)
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.tree.len() as u32
    }

    /// Number of slots, which is half the length of `positions()`.
    #[wasm_bindgen(js_name = slotCount)]
    pub fn slot_count(&self) -> u32 {
        self.node_of_slot.len() as u32
    }

    /// Remove every node and forget the last layout.
    pub fn clear(&mut self) {
        self.tree = Tree::new();
        self.slot_of_node.clear();
        self.node_of_slot.clear();
        self.placements.clear();
        self.index.clear();
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Lay out the tree.
    ///
    /// `options` is a partial `LayoutConfig` object such as
    /// `{ minHorizontalDistance: 40, coordinateMode: "radial" }`. Returns the
    /// layout statistics.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(&mut self, options: JsValue) -> std::result::Result<JsValue, JsError> {
        let config = config_from_js(options)?;
        let stats = self.layout_with(&config)?;
        to_js(&stats)
    }

    /// Positions from the last layout as `[x0, y0, x1, y1, ...]` per slot.
    pub fn positions(&self) -> Float32Array {
        Float32Array::from(&self.interleaved()[..])
    }

    /// Positions from the last layout as an object keyed by label.
    pub fn coordinates(&self) -> std::result::Result<JsValue, JsError> {
        let by_label: std::collections::BTreeMap<&str, Point> = self
            .placements
            .iter()
            .filter_map(|p| self.tree.label(p.id).map(|label| (label.as_str(), p.point())))
            .collect();
        to_js(&by_label)
    }

    /// Slots of every descendant of `slot`, for moving a subtree as a unit.
    #[wasm_bindgen(js_name = subtreeOf)]
    pub fn subtree_of(&self, slot: u32) -> std::result::Result<Vec<u32>, JsError> {
        Ok(self.subtree_slots(slot)?)
    }

    /// Indented text dump of the tree with its current coordinates.
    pub fn dump(&self) -> String {
        self.tree.to_string()
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Slot of the node nearest to a point, or None before any layout.
    #[wasm_bindgen(js_name = findNearestNode)]
    pub fn find_nearest_node(&self, x: f64, y: f64) -> Option<u32> {
        self.index.nearest(x, y).map(|id| self.slot_of_node[id.index()])
    }

    #[wasm_bindgen(js_name = findNearestNodeWithin)]
    pub fn find_nearest_node_within(&self, x: f64, y: f64, max_distance: f64) -> Option<u32> {
        self.index
            .nearest_within(x, y, max_distance)
            .map(|id| self.slot_of_node[id.index()])
    }

    /// Slots of all nodes inside a rectangle.
    #[wasm_bindgen(js_name = findNodesInRect)]
    pub fn find_nodes_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<u32> {
        self.index
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|id| self.slot_of_node[id.index()])
            .collect()
    }

    /// Slots of all nodes within `radius` of a point.
    #[wasm_bindgen(js_name = findNodesInRadius)]
    pub fn find_nodes_in_radius(&self, x: f64, y: f64, radius: f64) -> Vec<u32> {
        self.index
            .in_radius(x, y, radius)
            .into_iter()
            .map(|id| self.slot_of_node[id.index()])
            .collect()
    }
}

impl TreeLayoutWasm {
    fn push_root(&mut self, label: String) -> Result<u32> {
        let id = self.tree.add_root(label)?;
        Ok(self.register(id))
    }

    fn push_child(&mut self, parent: u32, label: String) -> Result<u32> {
        let parent = self.node(parent)?;
        let id = self.tree.add_child(parent, label)?;
        Ok(self.register(id))
    }

    fn replace_from_edges(&mut self, node_count: usize, edges: &[u32], root: Option<u32>) -> Result<u32> {
        let tree = Tree::from_edges(node_count, edges, root)?;

        self.clear();
        self.node_of_slot = vec![None; node_count];
        for (id, node) in tree.iter() {
            let slot = *node.label();
            self.slot_of_node.push(slot);
            self.node_of_slot[slot as usize] = Some(id);
        }
        self.tree = tree.map_labels(|slot| slot.to_string());
        Ok(self.tree.len() as u32)
    }

    fn subtree_slots(&self, slot: u32) -> Result<Vec<u32>> {
        let id = self.node(slot)?;
        Ok(self
            .tree
            .subtree(id)?
            .into_iter()
            .map(|id| self.slot_of_node[id.index()])
            .collect())
    }

    fn register(&mut self, id: NodeId) -> u32 {
        let slot = self.node_of_slot.len() as u32;
        self.node_of_slot.push(Some(id));
        self.slot_of_node.push(slot);
        slot
    }

    fn node(&self, slot: u32) -> Result<NodeId> {
        self.node_of_slot
            .get(slot as usize)
            .copied()
            .flatten()
            .ok_or_else(|| LayoutError::invalid_argument(format!("no node in slot {slot}")))
    }

    fn layout_with(&mut self, config: &LayoutConfig) -> Result<LayoutStats> {
        let stats = TidyTreeLayout::new(config.clone()).layout(&mut self.tree)?;
        self.placements = self.tree.placements(config)?;
        self.index.rebuild(&self.placements);
        Ok(stats)
    }

    fn interleaved(&self) -> Vec<f32> {
        interleave(&self.placements, self.node_of_slot.len(), |id| {
            self.slot_of_node.get(id.index()).map(|&slot| slot as usize)
        })
    }
}

impl Default for TreeLayoutWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out a binary tree given as parallel child-slot arrays.
///
/// Node `i` has left child `left[i]` and right child `right[i]`
/// (`0xFFFFFFFF` for none). Returns `[x0, y0, x1, y1, ...]` per node, with
/// `SENTINEL` for nodes unreachable from `root`.
#[wasm_bindgen(js_name = computeBinaryLayout)]
pub fn compute_binary_layout(
    left: &[u32],
    right: &[u32],
    root: u32,
    options: JsValue,
) -> std::result::Result<Float32Array, JsError> {
    let config = config_from_js(options)?;
    let positions = binary_positions(left, right, root, &config)?;
    Ok(Float32Array::from(&positions[..]))
}

fn binary_positions(
    left: &[u32],
    right: &[u32],
    root: u32,
    config: &LayoutConfig,
) -> Result<Vec<f32>> {
    let mut tree = BinaryTree::from_child_slots(left, right, root)?;
    BinaryTreeLayout::new(config.clone()).layout(&mut tree)?;
    let placements = tree.placements(config)?;
    Ok(interleave(&placements, left.len(), |id| Some(id.index())))
}
