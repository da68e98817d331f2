//! Building a [`Tree`] from edge lists and petgraph graphs.
//!
//! Both builders accept directed parent→child edges, keep children in edge
//! insertion order, and auto-detect the root when none is given: the
//! parentless node with the most descendants wins (lowest id on ties).
//! Anything that is not a tree is rejected with a [`StructuralError`].

use std::collections::HashSet;

use log::debug;
use petgraph::Directed;
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, NodeIndexable};

use super::{NodeId, Tree};
use crate::error::{LayoutError, Result, StructuralError};

impl Tree<u32> {
    /// Build a tree from a flat array of directed edge pairs
    /// `[parent0, child0, parent1, child1, ...]` over node slots
    /// `0..node_count`. Labels are the slot numbers.
    ///
    /// With no edges the result is a single-node tree if `root` is given and
    /// an empty tree otherwise. Slots not reachable from the root are left out.
    pub fn from_edges(node_count: usize, edges: &[u32], root: Option<u32>) -> Result<Self> {
        if edges.len() % 2 != 0 {
            return Err(LayoutError::invalid_argument(format!(
                "edge array must hold parent/child pairs, got {} entries",
                edges.len()
            )));
        }

        let mut children: Vec<Vec<u32>> = vec![Vec::new(); node_count];
        let mut parent_of: Vec<Option<u32>> = vec![None; node_count];
        let mut referenced = vec![false; node_count];

        for pair in edges.chunks_exact(2) {
            let (parent, child) = (pair[0], pair[1]);
            for slot in [parent, child] {
                if slot as usize >= node_count {
                    return Err(LayoutError::invalid_argument(format!(
                        "edge {parent}→{child} references node {slot} beyond {node_count} slots"
                    )));
                }
            }
            if parent == child {
                return Err(StructuralError::SelfLoop {
                    node: NodeId(parent),
                }
                .into());
            }
            if parent_of[child as usize].replace(parent).is_some() {
                return Err(StructuralError::MultipleParents {
                    node: NodeId(child),
                }
                .into());
            }
            children[parent as usize].push(child);
            referenced[parent as usize] = true;
            referenced[child as usize] = true;
        }

        let root = match root {
            Some(root) if root as usize >= node_count => {
                return Err(LayoutError::invalid_argument(format!(
                    "root {root} is beyond {node_count} slots"
                )));
            }
            Some(root) => root,
            None if edges.is_empty() => return Ok(Tree::new()),
            None => {
                let candidates = (0..node_count as u32)
                    .filter(|&slot| referenced[slot as usize] && parent_of[slot as usize].is_none());
                pick_root(candidates, |slot| {
                    count_descendants(slot, |n| children[n as usize].iter().copied())
                })
                .ok_or(StructuralError::NoRoot)?
            }
        };

        let mut tree = Tree::with_capacity(node_count);
        let mut visited = vec![false; node_count];
        visited[root as usize] = true;
        let root_id = tree.add_root(root)?;
        let mut stack = vec![(root, root_id)];

        while let Some((slot, id)) = stack.pop() {
            for &child in &children[slot as usize] {
                if std::mem::replace(&mut visited[child as usize], true) {
                    return Err(StructuralError::Cycle {
                        node: NodeId(child),
                    }
                    .into());
                }
                let child_id = tree.add_child(id, child)?;
                stack.push((child, child_id));
            }
        }

        let excluded = referenced.iter().filter(|&&r| r).count().saturating_sub(tree.len());
        if excluded > 0 {
            debug!("from_edges: {excluded} node(s) unreachable from root {root} left out");
        }
        Ok(tree)
    }
}

impl<N: Clone> Tree<N> {
    /// Build a tree from a petgraph graph whose edges point parent→child.
    /// Node weights become labels; children keep edge insertion order.
    pub fn from_graph<E>(
        graph: &StableGraph<N, E, Directed>,
        root: Option<NodeIndex>,
    ) -> Result<Self> {
        for edge in graph.edge_indices() {
            if let Some((source, target)) = graph.edge_endpoints(edge)
                && source == target
            {
                return Err(StructuralError::SelfLoop {
                    node: graph_node_id(source),
                }
                .into());
            }
        }
        for index in graph.node_indices() {
            if graph.edges_directed(index, Direction::Incoming).nth(1).is_some() {
                return Err(StructuralError::MultipleParents {
                    node: graph_node_id(index),
                }
                .into());
            }
        }

        let ordered_children = |index: NodeIndex| {
            let mut edges: Vec<_> = graph
                .edges_directed(index, Direction::Outgoing)
                .map(|edge| (edge.id(), edge.target()))
                .collect();
            edges.sort_by_key(|(edge, _)| edge.index());
            edges.into_iter().map(|(_, target)| target)
        };

        let root = match root {
            Some(root) if !graph.contains_node(root) => {
                return Err(LayoutError::invalid_argument(format!(
                    "root {} is not in the graph",
                    graph_node_id(root)
                )));
            }
            Some(root) => root,
            None if graph.node_count() == 0 => return Ok(Tree::new()),
            None => {
                let candidates = graph.node_indices().filter(|&index| {
                    graph
                        .edges_directed(index, Direction::Incoming)
                        .next()
                        .is_none()
                });
                pick_root(candidates, |index| {
                    count_descendants(index, |n| graph.neighbors_directed(n, Direction::Outgoing))
                })
                .ok_or(StructuralError::NoRoot)?
            }
        };

        let mut tree = Tree::with_capacity(graph.node_count());
        let mut visited = vec![false; graph.node_bound()];
        visited[root.index()] = true;
        let root_id = tree.add_root(graph[root].clone())?;
        let mut stack = vec![(root, root_id)];

        while let Some((index, id)) = stack.pop() {
            for child in ordered_children(index) {
                if std::mem::replace(&mut visited[child.index()], true) {
                    return Err(StructuralError::Cycle {
                        node: graph_node_id(child),
                    }
                    .into());
                }
                let child_id = tree.add_child(id, graph[child].clone())?;
                stack.push((child, child_id));
            }
        }
        Ok(tree)
    }
}

fn graph_node_id(index: NodeIndex) -> NodeId {
    NodeId::from_index(index.index())
}

/// Choose the candidate with the most descendants; the earliest one on ties.
fn pick_root<K: Copy>(
    candidates: impl Iterator<Item = K>,
    mut descendants: impl FnMut(K) -> usize,
) -> Option<K> {
    let mut best: Option<(K, usize)> = None;
    for candidate in candidates {
        let count = descendants(candidate);
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((candidate, count));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Count descendants of a node. Uses a visited set to stay finite on cycles.
fn count_descendants<K, I>(node: K, mut children: impl FnMut(K) -> I) -> usize
where
    K: Copy + Eq + std::hash::Hash,
    I: Iterator<Item = K>,
{
    let mut count = 0;
    let mut stack = vec![node];
    let mut visited = HashSet::new();
    visited.insert(node);
    while let Some(n) = stack.pop() {
        for child in children(n) {
            if visited.insert(child) {
                count += 1;
                stack.push(child);
            }
        }
    }
    count
}
