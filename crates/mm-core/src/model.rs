//! Mind-map data model: nodes, ports and edges.
//!
//! Nodes are positioned boxes in canvas space carrying a text label. Edges
//! connect one node's port to another's. Ports are not stored; they are
//! derived on demand from a node's bounds.

use crate::geometry::{Point, Rect, Size, clamp};
use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

pub const MIN_NODE_WIDTH: f32 = 100.0;
pub const MIN_NODE_HEIGHT: f32 = 60.0;
pub const MAX_NODE_WIDTH: f32 = 300.0;

/// Horizontal pixels allotted per character of node text.
const CHAR_WIDTH: f32 = 8.0;
/// Characters per wrapped line, and the height of one line.
const CHARS_PER_LINE: usize = 20;
const LINE_HEIGHT: f32 = 30.0;

// ─── Ports ───────────────────────────────────────────────────────────────

/// Attachment point on a node's bounding box (mid-height of a side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    Left,
    Right,
}

impl Port {
    /// Horizontal direction a connector leaves this port: -1 or +1.
    pub fn outward(self) -> f32 {
        match self {
            Port::Left => -1.0,
            Port::Right => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Port::Left => "left",
            Port::Right => "right",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Port::Left),
            "right" => Some(Port::Right),
            _ => None,
        }
    }
}

/// A specific port on a specific node: one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    pub port: Port,
}

impl PortRef {
    pub fn new(node: NodeId, port: Port) -> Self {
        Self { node, port }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Top-left corner in canvas space.
    pub position: Point,
    pub size: Size,
    pub text: String,
}

impl Node {
    /// A node whose size is derived from `text`.
    pub fn new(id: NodeId, position: Point, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            position,
            size: size_for_text(&text),
            text,
        }
    }

    /// A node with an explicit size, raised to the minimum if smaller.
    pub fn with_size(id: NodeId, position: Point, size: Size, text: impl Into<String>) -> Self {
        Self {
            id,
            position,
            size: Size::new(
                size.width.max(MIN_NODE_WIDTH),
                size.height.max(MIN_NODE_HEIGHT),
            ),
            text: text.into(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Canvas-space position of a port: the mid-point of the left or right side.
    pub fn port_position(&self, port: Port) -> Point {
        let y = self.position.y + self.size.height / 2.0;
        match port {
            Port::Left => Point::new(self.position.x, y),
            Port::Right => Point::new(self.position.x + self.size.width, y),
        }
    }
}

/// Node dimensions as a function of its text length (in characters).
///
/// Width grows with the text up to a ceiling; height adds one line per
/// twenty characters. Both are non-decreasing in the length.
pub fn size_for_text(text: &str) -> Size {
    let len = text.chars().count();
    let width = clamp(len as f32 * CHAR_WIDTH, MIN_NODE_WIDTH, MAX_NODE_WIDTH);
    let lines = len.div_ceil(CHARS_PER_LINE);
    let height = (lines as f32 * LINE_HEIGHT).max(MIN_NODE_HEIGHT);
    Size::new(width, height)
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// A connection from one node port to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: PortRef,
    pub to: PortRef,
}

impl Edge {
    pub fn new(id: EdgeId, from: PortRef, to: PortRef) -> Self {
        Self { id, from, to }
    }

    /// True when this edge joins the same two endpoints as `a`/`b`, in
    /// either direction.
    pub fn connects(&self, a: PortRef, b: PortRef) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from.node == node || self.to.node == node
    }

    pub fn is_self_loop(&self) -> bool {
        self.from.node == self.to.node
    }
}
