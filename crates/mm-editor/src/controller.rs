//! The canvas controller: single owner of all mind-map state.
//!
//! Every inbound command is routed to the component that owns the affected
//! state (viewport, node store, connection manager, drag tracker). When a
//! command changes anything, edge routes are recomputed against the current
//! node positions and a fresh `RenderSnapshot` is published.
//!
//! Commands that reference unknown nodes or edges are silent no-ops.

use crate::drag::{DragTracker, TimerId};
use crate::host::CanvasHost;
use crate::input::CanvasCommand;
use crate::snapshot::RenderSnapshot;
use crate::viewport::{ViewportController, ViewportState};
use mm_core::{
    CanvasConfig, ClickOutcome, ConnectionManager, Edge, EdgeId, Node, NodeId, NodeStore, Point,
    Port, PortRef,
};
use std::sync::Arc;
use std::time::Duration;

pub struct CanvasController<H: CanvasHost> {
    config: CanvasConfig,
    viewport: ViewportController,
    nodes: NodeStore,
    connections: ConnectionManager,
    drags: DragTracker,
    host: H,
    snapshot: Arc<RenderSnapshot>,
}

impl<H: CanvasHost> CanvasController<H> {
    /// Create an empty canvas.
    pub fn new(config: CanvasConfig, host: H) -> Result<Self, String> {
        Self::with_nodes(config, host, Vec::new(), Vec::new())
    }

    /// Create a canvas seeded with existing nodes and edges.
    ///
    /// Nodes with a duplicate id are skipped, as are edges whose endpoints
    /// are missing or that duplicate an earlier edge.
    pub fn with_nodes(
        config: CanvasConfig,
        host: H,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    ) -> Result<Self, String> {
        config.validate()?;

        let mut store = NodeStore::new();
        for node in nodes {
            // Raise undersized seeds to the minimum node size.
            store.insert(Node::with_size(node.id, node.position, node.size, node.text));
        }
        let mut connections = ConnectionManager::new();
        for edge in edges {
            if store.contains(edge.from.node) && store.contains(edge.to.node) {
                connections.insert_edge(edge);
            } else {
                log::debug!("SEED edge {:?} dropped: missing endpoint", edge.id);
            }
        }

        let viewport = ViewportController::new(config.min_scale, config.max_scale);
        let snapshot = Arc::new(RenderSnapshot::build(
            0,
            &store,
            &connections,
            viewport.state(),
            &config,
        ));
        Ok(Self {
            config,
            viewport,
            nodes: store,
            connections,
            drags: DragTracker::new(),
            host,
            snapshot,
        })
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<RenderSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn revision(&self) -> u64 {
        self.snapshot.revision
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn pending_connection(&self) -> Option<PortRef> {
        self.connections.pending()
    }

    pub fn is_dragging(&self, node: NodeId) -> bool {
        self.drags.is_dragging(node)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ─── Command dispatch ────────────────────────────────────────────────

    /// Apply one command. Returns `true` when a new snapshot was published.
    pub fn apply(&mut self, command: CanvasCommand) -> bool {
        if !command.is_continuous() {
            log::debug!("CMD {command:?}");
        }
        let before = self.snapshot.revision;
        match command {
            CanvasCommand::AddNode => {
                self.add_node();
            }
            CanvasCommand::BeginDrag { node } => {
                self.begin_drag(node);
            }
            CanvasCommand::UpdateDrag { node, dx, dy } => {
                self.update_drag(node, dx, dy);
            }
            CanvasCommand::EndDrag { node } => {
                self.end_drag(node);
            }
            CanvasCommand::SetText { node, text } => {
                self.set_text(node, &text);
            }
            CanvasCommand::ClickPort { node, port } => {
                self.click_port(node, port);
            }
            CanvasCommand::CancelPendingConnection => {
                self.cancel_pending_connection();
            }
            CanvasCommand::DeleteNode { node } => {
                self.delete_node(node);
            }
            CanvasCommand::RemoveEdge { edge } => {
                self.remove_edge(edge);
            }
            CanvasCommand::BeginPan => self.begin_pan(),
            CanvasCommand::UpdatePan { dx, dy } => {
                self.update_pan(dx, dy);
            }
            CanvasCommand::EndPan => self.end_pan(),
            CanvasCommand::BeginPinch => self.begin_pinch(),
            CanvasCommand::UpdatePinch {
                scale,
                focal_x,
                focal_y,
            } => {
                self.update_pinch(scale, focal_x, focal_y);
            }
            CanvasCommand::EndPinch => self.end_pinch(),
            CanvasCommand::TimerFired { timer } => {
                self.timer_fired(timer);
            }
        }
        self.snapshot.revision != before
    }

    /// Rebuild routes and publish a new snapshot.
    fn publish(&mut self) {
        let revision = self.snapshot.revision + 1;
        self.snapshot = Arc::new(RenderSnapshot::build(
            revision,
            &self.nodes,
            &self.connections,
            self.viewport.state(),
            &self.config,
        ));
        log::trace!(
            "SNAPSHOT r{revision}: {} nodes, {} edges",
            self.snapshot.nodes.len(),
            self.snapshot.edges.len()
        );
    }

    /// Publish when `changed`, passing the flag through.
    fn publish_if(&mut self, changed: bool) -> bool {
        if changed {
            self.publish();
        }
        changed
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Add a node whose top-left corner sits under the center of the screen.
    pub fn add_node(&mut self) -> NodeId {
        let center = Point::new(
            self.config.spawn_size.width / 2.0,
            self.config.spawn_size.height / 2.0,
        );
        let position = self.viewport.screen_to_canvas(center);
        let id = self.nodes.add_node(position, &self.config.placeholder_text);
        self.publish();
        id
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        let changed = self.nodes.set_text(node, text);
        self.publish_if(changed)
    }

    /// Delete a node, its edges, any pending connection on it, and any
    /// drag (and long-press timer) in flight on it.
    pub fn delete_node(&mut self, node: NodeId) -> bool {
        if self.nodes.delete_node(node).is_none() {
            return false;
        }
        if let Some(gesture) = self.drags.end(node)
            && let Some(timer) = gesture.timer
        {
            self.host.cancel_timer(timer);
        }
        self.connections.on_node_deleted(node);
        self.publish();
        true
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    /// Start dragging `node` and arm its long-press timer.
    pub fn begin_drag(&mut self, node: NodeId) -> bool {
        let Some(origin) = self.nodes.get(node).map(|n| n.position) else {
            return false;
        };
        let (timer, previous) = self.drags.begin(node, origin, self.viewport.scale());
        if let Some(old) = previous.and_then(|g| g.timer) {
            self.host.cancel_timer(old);
        }
        self.host
            .schedule_timer(timer, Duration::from_millis(self.config.long_press_ms));
        true
    }

    /// Move `node` by the screen-space translation since `begin_drag`.
    pub fn update_drag(&mut self, node: NodeId, dx: f32, dy: f32) -> bool {
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let Some((gesture, cancelled)) =
            self.drags
                .record_move(node, dx, dy, self.config.drag_threshold)
        else {
            return false;
        };
        if let Some(timer) = cancelled {
            log::debug!("DRAG {node:?} moved past threshold, long-press cancelled");
            self.host.cancel_timer(timer);
        }
        let changed = self.nodes.move_node(node, gesture.position_for(dx, dy));
        self.publish_if(changed)
    }

    /// Finish a drag. Its long-press timer, if still armed, is cancelled.
    pub fn end_drag(&mut self, node: NodeId) -> bool {
        let Some(gesture) = self.drags.end(node) else {
            return false;
        };
        if let Some(timer) = gesture.timer {
            self.host.cancel_timer(timer);
        }
        true
    }

    /// A host timer elapsed. If it is the armed long-press timer of a drag
    /// that has not moved, ask the host to confirm deleting the node.
    pub fn timer_fired(&mut self, timer: TimerId) -> bool {
        let Some(gesture) = self.drags.fire(timer) else {
            log::trace!("TIMER {timer:?} stale, ignored");
            return false;
        };
        if gesture.moved || !self.nodes.contains(gesture.node) {
            return false;
        }
        log::debug!("LONG-PRESS {:?}: requesting delete confirmation", gesture.node);
        self.host.request_delete_confirmation(gesture.node);
        true
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Feed a port click into the connection state machine. Clicks on
    /// unknown nodes are ignored and return `None`.
    pub fn click_port(&mut self, node: NodeId, port: Port) -> Option<ClickOutcome> {
        if !self.nodes.contains(node) {
            return None;
        }
        let outcome = self.connections.click_port(PortRef::new(node, port));
        self.publish();
        Some(outcome)
    }

    pub fn cancel_pending_connection(&mut self) -> bool {
        let changed = self.connections.cancel();
        self.publish_if(changed)
    }

    pub fn remove_edge(&mut self, edge: EdgeId) -> bool {
        let changed = self.connections.remove_edge(edge).is_some();
        self.publish_if(changed)
    }

    // ─── Viewport ────────────────────────────────────────────────────────

    pub fn begin_pan(&mut self) {
        self.viewport.begin_pan();
    }

    pub fn update_pan(&mut self, dx: f32, dy: f32) -> bool {
        let changed = self.viewport.update_pan(dx, dy);
        self.publish_if(changed)
    }

    pub fn end_pan(&mut self) {
        self.viewport.end_pan();
    }

    pub fn begin_pinch(&mut self) {
        self.viewport.begin_pinch();
    }

    pub fn update_pinch(&mut self, scale: f32, focal_x: f32, focal_y: f32) -> bool {
        let changed = self
            .viewport
            .update_pinch(scale, Point::new(focal_x, focal_y));
        self.publish_if(changed)
    }

    pub fn end_pinch(&mut self) {
        self.viewport.end_pinch();
    }
}
