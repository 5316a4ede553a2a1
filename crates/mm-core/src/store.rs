//! The node collection.
//!
//! Nodes are kept in insertion order, which doubles as z-order: the last
//! node inserted is painted on top. Every mutation addresses exactly one
//! node by id and replaces that entry wholesale, so interleaved gestures on
//! different nodes never disturb each other.

use crate::geometry::{Point, Rect};
use crate::id::NodeId;
use crate::model::{Node, size_for_text};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
    /// Id → position in `nodes`. Rebuilt after removals.
    index: HashMap<NodeId, usize>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with a generated id at `position`, sized for `text`.
    pub fn add_node(&mut self, position: Point, text: &str) -> NodeId {
        let mut id = NodeId::generate();
        while self.index.contains_key(&id) {
            id = NodeId::generate();
        }
        self.push(Node::new(id, position, text));
        log::debug!("ADD node {id:?} at ({}, {})", position.x, position.y);
        id
    }

    /// Insert a prebuilt node. Returns `false` (and inserts nothing) when
    /// the id is already taken.
    pub fn insert(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            log::debug!("INSERT rejected, duplicate id {:?}", node.id);
            return false;
        }
        self.push(node);
        true
    }

    fn push(&mut self, node: Node) {
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Replace the position of `id`. Returns whether anything changed.
    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.position == position {
            return false;
        }
        *node = Node {
            position,
            ..node.clone()
        };
        true
    }

    /// Replace the text of `id` and recompute its size from the new text.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.text == text {
            return false;
        }
        *node = Node {
            size: size_for_text(text),
            text: text.to_string(),
            ..node.clone()
        };
        true
    }

    /// Remove `id`, returning the removed node.
    ///
    /// Edges are not owned here; the caller is responsible for cascading the
    /// removal into the connection manager.
    pub fn delete_node(&mut self, id: NodeId) -> Option<Node> {
        let pos = self.index.remove(&id)?;
        let removed = self.nodes.remove(pos);
        for (i, node) in self.nodes.iter().enumerate().skip(pos) {
            self.index.insert(node.id, i);
        }
        log::debug!("DELETE node {id:?}");
        Some(removed)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index.get(&id).copied().map(|i| &mut self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Nodes in z-order (bottom first).
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding boxes of every node except `a` and `b` (an edge's own ends).
    pub fn obstacles_excluding(&self, a: NodeId, b: NodeId) -> Vec<Rect> {
        self.nodes
            .iter()
            .filter(|n| n.id != a && n.id != b)
            .map(Node::bounds)
            .collect()
    }
}
