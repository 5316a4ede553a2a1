//! Immutable per-update render data.
//!
//! A snapshot is rebuilt after every accepted command and handed out behind
//! an `Arc`; the renderer may keep an old one while the next is built.
//! `revision` increases by one per rebuild, so "did anything change" is a
//! single integer compare.

use crate::viewport::ViewportState;
use mm_core::curve::{generate_path_through_waypoints, port_bezier_path};
use mm_core::{
    CanvasConfig, ConnectionManager, CurveStyle, Edge, EdgeId, Node, NodeStore, PathCmd, Point,
    PortRef, RouteKind, Waypoints, calculate_path_with_obstacles,
};
use serde::Serialize;

/// An edge with its routed, drawable geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedEdge {
    pub id: EdgeId,
    pub from: PortRef,
    pub to: PortRef,
    /// Port positions in screen space.
    pub from_point: Point,
    pub to_point: Point,
    pub route: RouteKind,
    /// Routed polyline in canvas space.
    pub waypoints: Waypoints,
    /// Drawable curve in screen space.
    pub path: Vec<PathCmd>,
}

/// The first port of an in-progress connection, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PendingHighlight {
    pub port: PortRef,
    /// Port position in screen space.
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub revision: u64,
    /// Nodes in z-order (bottom first), canvas space.
    pub nodes: Vec<Node>,
    pub edges: Vec<RoutedEdge>,
    pub viewport: ViewportState,
    pub pending: Option<PendingHighlight>,
}

impl RenderSnapshot {
    pub fn build(
        revision: u64,
        nodes: &NodeStore,
        connections: &ConnectionManager,
        viewport: ViewportState,
        config: &CanvasConfig,
    ) -> Self {
        let edges = connections
            .edges()
            .filter_map(|edge| route_edge(edge, nodes, viewport, config))
            .collect();

        let pending = connections.pending().and_then(|port| {
            let node = nodes.get(port.node)?;
            Some(PendingHighlight {
                port,
                position: viewport.canvas_to_screen(node.port_position(port.port)),
            })
        });

        Self {
            revision,
            nodes: nodes.as_slice().to_vec(),
            edges,
            viewport,
            pending,
        }
    }

    pub fn node(&self, id: mm_core::NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&RoutedEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("snapshot serialization failed: {e}"))
    }
}

/// Route one edge against every other node and build its screen-space curve.
/// Edges whose endpoints are missing are skipped.
pub fn route_edge(
    edge: &Edge,
    nodes: &NodeStore,
    viewport: ViewportState,
    config: &CanvasConfig,
) -> Option<RoutedEdge> {
    let start = nodes.get(edge.from.node)?.port_position(edge.from.port);
    let end = nodes.get(edge.to.node)?.port_position(edge.to.port);
    let obstacles = nodes.obstacles_excluding(edge.from.node, edge.to.node);
    let route = calculate_path_with_obstacles(start, end, &obstacles, &config.router);

    let from_point = viewport.canvas_to_screen(start);
    let to_point = viewport.canvas_to_screen(end);
    let path = if route.kind.is_straight() && config.curve.style == CurveStyle::PortBezier {
        // The cap is a canvas-space distance; scale it with the view.
        port_bezier_path(
            from_point,
            edge.from.port,
            to_point,
            edge.to.port,
            config.curve.port_offset_cap * viewport.scale,
        )
    } else {
        let screen: Vec<Point> = route
            .waypoints
            .iter()
            .map(|&p| viewport.canvas_to_screen(p))
            .collect();
        generate_path_through_waypoints(&screen, config.curve.control_distance)
    };

    Some(RoutedEdge {
        id: edge.id,
        from: edge.from,
        to: edge.to,
        from_point,
        to_point,
        route: route.kind,
        waypoints: route.waypoints,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{NodeId, Port, Size};
    use pretty_assertions::assert_eq;

    fn seeded() -> (NodeStore, ConnectionManager, EdgeId) {
        let mut nodes = NodeStore::new();
        let a = NodeId::intern("snap_a");
        let b = NodeId::intern("snap_b");
        nodes.insert(Node::with_size(a, Point::new(0.0, 0.0), Size::new(100.0, 60.0), "A"));
        nodes.insert(Node::with_size(b, Point::new(400.0, 0.0), Size::new(100.0, 60.0), "B"));
        let mut cm = ConnectionManager::new();
        let id = cm
            .connect(PortRef::new(a, Port::Right), PortRef::new(b, Port::Left))
            .unwrap();
        (nodes, cm, id)
    }

    #[test]
    fn direct_edge_uses_port_bezier_in_screen_space() {
        let (nodes, cm, id) = seeded();
        let viewport = ViewportState {
            scale: 2.0,
            offset: Point::new(10.0, 20.0),
        };
        let snap = RenderSnapshot::build(1, &nodes, &cm, viewport, &CanvasConfig::default());
        let edge = snap.edge(id).unwrap();
        assert_eq!(edge.route, RouteKind::Direct);
        assert_eq!(edge.from_point, Point::new(210.0, 80.0));
        assert_eq!(edge.to_point, Point::new(810.0, 80.0));
        assert_eq!(edge.path[0], PathCmd::MoveTo(Point::new(210.0, 80.0)));
        assert!(matches!(edge.path[1], PathCmd::CubicTo(..)));
        // Waypoints stay in canvas space.
        assert_eq!(edge.waypoints[0], Point::new(100.0, 30.0));
    }

    #[test]
    fn waypoint_style_draws_a_line() {
        let (nodes, cm, id) = seeded();
        let config = CanvasConfig {
            curve: mm_core::CurveConfig {
                style: CurveStyle::Waypoints,
                ..Default::default()
            },
            ..Default::default()
        };
        let snap = RenderSnapshot::build(1, &nodes, &cm, ViewportState::default(), &config);
        assert_eq!(
            snap.edge(id).unwrap().path,
            vec![
                PathCmd::MoveTo(Point::new(100.0, 30.0)),
                PathCmd::LineTo(Point::new(400.0, 30.0)),
            ]
        );
    }

    #[test]
    fn pending_port_is_highlighted() {
        let (nodes, mut cm, _) = seeded();
        cm.click_port(PortRef::new(NodeId::intern("snap_b"), Port::Right));
        let snap =
            RenderSnapshot::build(3, &nodes, &cm, ViewportState::default(), &CanvasConfig::default());
        let pending = snap.pending.unwrap();
        assert_eq!(pending.position, Point::new(500.0, 30.0));
        assert_eq!(snap.revision, 3);
    }

    #[test]
    fn serializes_to_json() {
        let (nodes, cm, _) = seeded();
        let snap =
            RenderSnapshot::build(7, &nodes, &cm, ViewportState::default(), &CanvasConfig::default());
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"revision\":7"));
        assert!(json.contains("\"route\":\"direct\""));
        assert!(json.contains("\"snap_a\""));
    }
}
