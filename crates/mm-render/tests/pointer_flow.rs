//! Integration tests: a host's pointer handling built on hit testing,
//! feeding commands back into the controller.

use mm_core::{CanvasConfig, ClickOutcome, Node, NodeId, Point, Port, PortRef, Size};
use mm_editor::{CanvasController, NullHost};
use mm_render::hit::EDGE_HIT_TOLERANCE;
use mm_render::{hit_test_edge, hit_test_node, hit_test_port, render_svg};
use pretty_assertions::assert_eq;

fn canvas() -> (CanvasController<NullHost>, NodeId, NodeId) {
    let a = NodeId::intern("flow_a");
    let b = NodeId::intern("flow_b");
    let c = CanvasController::with_nodes(
        CanvasConfig::default(),
        NullHost,
        vec![
            Node::with_size(a, Point::new(0.0, 0.0), Size::new(100.0, 60.0), "A"),
            Node::with_size(b, Point::new(400.0, 0.0), Size::new(100.0, 60.0), "B"),
        ],
        Vec::new(),
    )
    .unwrap();
    (c, a, b)
}

/// What a host does on tap: ports first, then edges.
fn tap(c: &mut CanvasController<NullHost>, screen: Point) -> Option<ClickOutcome> {
    let snap = c.snapshot();
    if let Some(port) = hit_test_port(&snap, screen) {
        return c.click_port(port.node, port.port);
    }
    if let Some(edge) = hit_test_edge(&snap, screen, EDGE_HIT_TOLERANCE) {
        c.remove_edge(edge);
    }
    None
}

#[test]
fn tapping_ports_connects_and_tapping_edge_removes() {
    let (mut c, a, _) = canvas();
    assert_eq!(
        tap(&mut c, Point::new(102.0, 31.0)),
        Some(ClickOutcome::Selected(PortRef::new(a, Port::Right)))
    );
    assert!(matches!(tap(&mut c, Point::new(398.0, 29.0)), Some(ClickOutcome::Created(_))));
    assert_eq!(c.connections().len(), 1);

    assert_eq!(tap(&mut c, Point::new(250.0, 31.0)), None);
    assert!(c.connections().is_empty());
    assert_eq!(c.snapshot().edges.len(), 0);
}

#[test]
fn hit_tests_follow_a_zoomed_view() {
    let (mut c, a, b) = canvas();
    c.begin_pinch();
    c.update_pinch(2.0, 0.0, 0.0);
    c.end_pinch();

    let snap = c.snapshot();
    // B spans screen x 800..1000 at scale 2.
    assert_eq!(hit_test_node(&snap, Point::new(900.0, 60.0)), Some(b));
    assert_eq!(hit_test_node(&snap, Point::new(450.0, 30.0)), None);
    // A's right port sits at screen (200, 60); its target is 48 px wide now.
    assert_eq!(
        hit_test_port(&snap, Point::new(220.0, 80.0)),
        Some(PortRef::new(a, Port::Right))
    );
}

#[test]
fn export_tracks_the_latest_snapshot() {
    let (mut c, a, b) = canvas();
    c.click_port(a, Port::Right);
    c.click_port(b, Port::Left);
    let svg = render_svg(&c.snapshot());
    assert_eq!(svg.matches("<path").count(), 1);

    c.delete_node(b);
    let svg = render_svg(&c.snapshot());
    assert_eq!(svg.matches("<path").count(), 0);
    assert_eq!(svg.matches("<rect").count(), 1);
}
