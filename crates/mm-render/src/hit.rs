//! Hit testing: screen point → node, port or edge.
//!
//! Everything works off a published [`RenderSnapshot`], so hosts can test
//! against exactly what they last drew. Nodes and ports are tested front to
//! back (last in z-order = topmost).

use mm_core::curve::flatten;
use mm_core::geometry::{distance_to_segment, is_point_in_rect};
use mm_core::{EdgeId, NodeId, Point, Port, PortRef, Rect};
use mm_editor::RenderSnapshot;

/// Side of the square touch target around each port, in canvas units.
/// Ports are drawn inside the node, so the target scales with the view.
pub const PORT_HIT_SIZE: f32 = 24.0;

/// Default pick distance for edges, in screen units.
pub const EDGE_HIT_TOLERANCE: f32 = 8.0;

/// Curve samples per bezier segment when measuring edge distance.
const EDGE_SAMPLES: usize = 16;

/// Find the topmost node under `screen`.
/// Returns `None` if the point is over the background.
pub fn hit_test_node(snapshot: &RenderSnapshot, screen: Point) -> Option<NodeId> {
    let p = snapshot.viewport.screen_to_canvas(screen);
    snapshot
        .nodes
        .iter()
        .rev()
        .find(|n| is_point_in_rect(p, &n.bounds()))
        .map(|n| n.id)
}

/// Find the port whose touch target contains `screen`.
///
/// Port targets straddle the node border, so a point just outside a node
/// can still hit one of its ports. Ports win over node bodies: call this
/// before [`hit_test_node`].
pub fn hit_test_port(snapshot: &RenderSnapshot, screen: Point) -> Option<PortRef> {
    let p = snapshot.viewport.screen_to_canvas(screen);
    for node in snapshot.nodes.iter().rev() {
        for port in [Port::Left, Port::Right] {
            if is_point_in_rect(p, &port_target(node.port_position(port))) {
                return Some(PortRef::new(node.id, port));
            }
        }
    }
    None
}

/// Find the edge whose drawn curve passes within `tolerance` screen units of
/// `screen`. When several qualify the closest wins.
pub fn hit_test_edge(snapshot: &RenderSnapshot, screen: Point, tolerance: f32) -> Option<EdgeId> {
    let mut best: Option<(EdgeId, f32)> = None;
    for edge in &snapshot.edges {
        let samples = flatten(&edge.path, EDGE_SAMPLES);
        let d = samples
            .windows(2)
            .map(|w| distance_to_segment(screen, w[0], w[1]))
            .fold(f32::INFINITY, f32::min);
        if d <= tolerance && best.is_none_or(|(_, b)| d < b) {
            best = Some((edge.id, d));
        }
    }
    if let Some((id, d)) = best {
        log::trace!("HIT edge {id:?} at {d:.1}px");
    }
    best.map(|(id, _)| id)
}

/// Nodes whose bounds overlap a screen-space rectangle (marquee selection).
pub fn nodes_in_rect(snapshot: &RenderSnapshot, screen: Rect) -> Vec<NodeId> {
    let v = snapshot.viewport;
    let top_left = v.screen_to_canvas(Point::new(screen.left(), screen.top()));
    let bottom_right = v.screen_to_canvas(Point::new(screen.right(), screen.bottom()));
    let area = Rect::new(
        top_left.x,
        top_left.y,
        bottom_right.x - top_left.x,
        bottom_right.y - top_left.y,
    );
    snapshot
        .nodes
        .iter()
        .filter(|n| {
            let b = n.bounds();
            b.left() <= area.right()
                && b.right() >= area.left()
                && b.top() <= area.bottom()
                && b.bottom() >= area.top()
        })
        .map(|n| n.id)
        .collect()
}

fn port_target(center: Point) -> Rect {
    let half = PORT_HIT_SIZE / 2.0;
    Rect::new(center.x - half, center.y - half, PORT_HIT_SIZE, PORT_HIT_SIZE)
}
