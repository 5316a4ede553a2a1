//! Edge collection and the two-click connection state machine.
//!
//! ```text
//!            click(p)                    click(q != p)
//!   Idle ───────────────▶ Pending(p) ─────────────────▶ Idle  (+ edge p↔q unless duplicate)
//!    ▲                      │   │
//!    └──── click(p) ────────┘   └── cancel / delete(p.node) ──▶ Idle
//! ```
//!
//! Edges live in a `StableDiGraph` with one vertex per node id, so a node's
//! incident edges are found without scanning the whole set. Indices stay
//! valid across removals. Endpoint existence is the caller's concern: the
//! canvas controller only forwards clicks on nodes that exist in its store.

use crate::id::{EdgeId, NodeId};
use crate::model::{Edge, PortRef};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Where the connection gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    /// One port picked, waiting for the second.
    PendingFirstPort(PortRef),
}

/// What a port click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// First port picked.
    Selected(PortRef),
    /// The pending port was clicked again.
    Deselected,
    /// A new edge joins the pending port and the clicked one.
    Created(EdgeId),
    /// The two ports were already connected; nothing was added.
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct ConnectionManager {
    graph: StableDiGraph<NodeId, Edge>,
    vertices: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    state: ConnectionState,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            vertices: HashMap::new(),
            edge_index: HashMap::new(),
            state: ConnectionState::Idle,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn pending(&self) -> Option<PortRef> {
        match self.state {
            ConnectionState::Idle => None,
            ConnectionState::PendingFirstPort(p) => Some(p),
        }
    }

    /// Advance the state machine with a click on `port`.
    pub fn click_port(&mut self, port: PortRef) -> ClickOutcome {
        let outcome = match self.state {
            ConnectionState::Idle => {
                self.state = ConnectionState::PendingFirstPort(port);
                ClickOutcome::Selected(port)
            }
            ConnectionState::PendingFirstPort(first) if first == port => {
                self.state = ConnectionState::Idle;
                ClickOutcome::Deselected
            }
            ConnectionState::PendingFirstPort(first) => {
                self.state = ConnectionState::Idle;
                match self.connect(first, port) {
                    Some(id) => ClickOutcome::Created(id),
                    None => ClickOutcome::Duplicate,
                }
            }
        };
        log::debug!("PORT click {port:?} -> {outcome:?}");
        outcome
    }

    /// Force the state machine back to `Idle`. Returns whether a port was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.pending().is_some();
        self.state = ConnectionState::Idle;
        was_pending
    }

    /// Create an edge `from → to` unless the unordered pair is already joined.
    pub fn connect(&mut self, from: PortRef, to: PortRef) -> Option<EdgeId> {
        if self.are_connected(from, to) {
            return None;
        }
        let mut id = EdgeId::generate();
        while self.edge_index.contains_key(&id) {
            id = EdgeId::generate();
        }
        self.add_edge(Edge::new(id, from, to));
        Some(id)
    }

    /// Insert a prebuilt edge. Rejects a reused id or an already-joined pair.
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if self.edge_index.contains_key(&edge.id) || self.are_connected(edge.from, edge.to) {
            log::debug!("INSERT edge {:?} rejected", edge.id);
            return false;
        }
        self.add_edge(edge);
        true
    }

    fn add_edge(&mut self, edge: Edge) {
        let a = self.vertex(edge.from.node);
        let b = self.vertex(edge.to.node);
        let id = edge.id;
        let idx = self.graph.add_edge(a, b, edge);
        self.edge_index.insert(id, idx);
    }

    fn vertex(&mut self, node: NodeId) -> NodeIndex {
        if let Some(&idx) = self.vertices.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.vertices.insert(node, idx);
        idx
    }

    /// Whether an edge joins `a` and `b` in either direction.
    pub fn are_connected(&self, a: PortRef, b: PortRef) -> bool {
        let (Some(&va), Some(&vb)) = (self.vertices.get(&a.node), self.vertices.get(&b.node))
        else {
            return false;
        };
        self.graph
            .edges_connecting(va, vb)
            .chain(self.graph.edges_connecting(vb, va))
            .any(|e| e.weight().connects(a, b))
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let idx = self.edge_index.remove(&id)?;
        let edge = self.graph.remove_edge(idx)?;
        log::debug!("REMOVE edge {id:?}");
        Some(edge)
    }

    /// Drop every edge touching `node` and clear a pending port on it.
    /// Returns the removed edges.
    pub fn on_node_deleted(&mut self, node: NodeId) -> Vec<Edge> {
        if matches!(self.state, ConnectionState::PendingFirstPort(p) if p.node == node) {
            self.state = ConnectionState::Idle;
        }

        let Some(v) = self.vertices.remove(&node) else {
            return Vec::new();
        };
        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(v, Direction::Outgoing)
            .chain(self.graph.edges_directed(v, Direction::Incoming))
            .map(|e| e.id())
            .collect();

        let mut removed = Vec::with_capacity(incident.len());
        for idx in incident {
            // A self-loop shows up in both directions; the second removal is a no-op.
            if let Some(edge) = self.graph.remove_edge(idx) {
                self.edge_index.remove(&edge.id);
                removed.push(edge);
            }
        }
        self.graph.remove_node(v);
        if !removed.is_empty() {
            log::debug!("CASCADE {node:?}: removed {} edge(s)", removed.len());
        }
        removed
    }

    pub fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    pub fn len(&self) -> usize {
        self.edge_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_index.is_empty()
    }
}
