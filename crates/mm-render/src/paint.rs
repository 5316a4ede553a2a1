//! Snapshot → kurbo shapes.
//!
//! Converts a [`RenderSnapshot`] into screen-space kurbo geometry that any
//! 2D backend can fill and stroke: rounded node boxes, port dots and edge
//! curves. Drawing itself stays with the host.

use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};
use mm_core::{EdgeId, NodeId, PathCmd, Port, PortRef};
use mm_editor::RenderSnapshot;

/// Node corner radius, in canvas units.
pub const NODE_CORNER_RADIUS: f64 = 8.0;
/// Port dot radius, in canvas units.
pub const PORT_DOT_RADIUS: f64 = 6.0;
/// Edge stroke width, in screen units.
pub const EDGE_STROKE_WIDTH: f64 = 2.0;

/// Everything needed to draw one frame, in screen space and paint order.
#[derive(Debug, Clone)]
pub struct Scene {
    pub edges: Vec<(EdgeId, BezPath)>,
    pub nodes: Vec<(NodeId, RoundedRect)>,
    pub ports: Vec<(PortRef, Circle)>,
    /// Highlight ring around the first port of an in-progress connection.
    pub pending: Option<Circle>,
}

impl Scene {
    /// Screen-space bounding box of everything in the scene.
    pub fn bounds(&self) -> Option<Rect> {
        let edges = self.edges.iter().map(|(_, p)| p.bounding_box());
        let nodes = self.nodes.iter().map(|(_, r)| r.bounding_box());
        let ports = self.ports.iter().map(|(_, c)| c.bounding_box());
        edges.chain(nodes).chain(ports).reduce(|a, b| a.union(b))
    }
}

/// Build the screen-space scene for a snapshot.
pub fn build_scene(snapshot: &RenderSnapshot) -> Scene {
    let v = snapshot.viewport;
    let scale = v.scale as f64;

    let edges = snapshot
        .edges
        .iter()
        .map(|e| (e.id, to_bez_path(&e.path)))
        .collect();

    let mut nodes = Vec::with_capacity(snapshot.nodes.len());
    let mut ports = Vec::with_capacity(snapshot.nodes.len() * 2);
    for node in &snapshot.nodes {
        let b = node.bounds();
        let tl = v.canvas_to_screen(mm_core::Point::new(b.left(), b.top()));
        let br = v.canvas_to_screen(mm_core::Point::new(b.right(), b.bottom()));
        let rect = Rect::new(tl.x as f64, tl.y as f64, br.x as f64, br.y as f64);
        nodes.push((node.id, rect.to_rounded_rect(NODE_CORNER_RADIUS * scale)));

        for port in [Port::Left, Port::Right] {
            let center = to_kurbo(v.canvas_to_screen(node.port_position(port)));
            ports.push((
                PortRef::new(node.id, port),
                Circle::new(center, PORT_DOT_RADIUS * scale),
            ));
        }
    }

    let pending = snapshot
        .pending
        .map(|p| Circle::new(to_kurbo(p.position), PORT_DOT_RADIUS * scale * 2.0));

    log::trace!(
        "PAINT r{}: {} edges, {} nodes",
        snapshot.revision,
        snapshot.edges.len(),
        snapshot.nodes.len()
    );
    Scene {
        edges,
        nodes,
        ports,
        pending,
    }
}

/// Convert path commands to a kurbo path.
pub fn to_bez_path(commands: &[PathCmd]) -> BezPath {
    let mut bez = BezPath::new();
    for cmd in commands {
        match *cmd {
            PathCmd::MoveTo(p) => bez.move_to(to_kurbo(p)),
            PathCmd::LineTo(p) => bez.line_to(to_kurbo(p)),
            PathCmd::QuadTo(c, p) => bez.quad_to(to_kurbo(c), to_kurbo(p)),
            PathCmd::CubicTo(c1, c2, p) => bez.curve_to(to_kurbo(c1), to_kurbo(c2), to_kurbo(p)),
        }
    }
    bez
}

fn to_kurbo(p: mm_core::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}
