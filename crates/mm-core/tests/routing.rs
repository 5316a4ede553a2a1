//! Integration tests: node store → port geometry → obstacle routing.

use mm_core::geometry::{Point, Rect, Size, segment_intersects_rect};
use mm_core::route::is_route_clear;
use mm_core::{Node, NodeId, NodeStore, Port, RouteKind, RouterConfig, calculate_path_with_obstacles};
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store_with(nodes: &[(&str, f32, f32, f32, f32)]) -> NodeStore {
    let mut store = NodeStore::new();
    for &(id, x, y, w, h) in nodes {
        store.insert(Node::with_size(
            NodeId::intern(id),
            Point::new(x, y),
            Size::new(w, h),
            id,
        ));
    }
    store
}

fn route_between(store: &NodeStore, from: &str, to: &str) -> mm_core::Route {
    let (a, b) = (NodeId::intern(from), NodeId::intern(to));
    let start = store.get(a).unwrap().port_position(Port::Right);
    let end = store.get(b).unwrap().port_position(Port::Left);
    calculate_path_with_obstacles(
        start,
        end,
        &store.obstacles_excluding(a, b),
        &RouterConfig::default(),
    )
}

// ─── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn two_nodes_route_directly() {
    init_logger();
    let store = store_with(&[
        ("route_a", 0.0, 0.0, 100.0, 60.0),
        ("route_b", 400.0, 0.0, 100.0, 60.0),
    ]);
    let route = route_between(&store, "route_a", "route_b");
    assert_eq!(route.kind, RouteKind::Direct);
    assert_eq!(
        route.waypoints.as_slice(),
        &[Point::new(100.0, 30.0), Point::new(400.0, 30.0)]
    );
}

#[test]
fn node_between_ports_forces_a_detour() {
    init_logger();
    let store = store_with(&[
        ("detour_a", 0.0, 0.0, 100.0, 60.0),
        ("detour_b", 400.0, 0.0, 100.0, 60.0),
        ("detour_c", 200.0, -10.0, 100.0, 80.0),
    ]);
    let route = route_between(&store, "detour_a", "detour_b");
    assert!(!route.kind.is_straight(), "got {route:?}");

    let padded_c = Rect::new(200.0, -10.0, 100.0, 80.0).inflate(20.0);
    assert!(segment_intersects_rect(
        Point::new(100.0, 30.0),
        Point::new(400.0, 30.0),
        &padded_c
    ));
    assert!(is_route_clear(&route.waypoints, &[padded_c]));
}

#[test]
fn endpoint_nodes_are_never_obstacles() {
    init_logger();
    // B overlaps the straight line's far end, but it is the edge's own node.
    let store = store_with(&[
        ("self_a", 0.0, 0.0, 100.0, 60.0),
        ("self_b", 150.0, 0.0, 300.0, 200.0),
    ]);
    let route = route_between(&store, "self_a", "self_b");
    assert_eq!(route.kind, RouteKind::Direct);
}

// ─── Properties ─────────────────────────────────────────────────────────

/// Deterministic pseudo-random stream (LCG) so failures reproduce.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self, max: f32) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f32 / (1u64 << 31) as f32) * max
    }
}

#[test]
fn routes_are_direct_iff_unobstructed_otherwise_clear_or_fallback() {
    init_logger();
    let config = RouterConfig::default();
    let mut rng = Lcg(0x5eed);

    for _ in 0..500 {
        let start = Point::new(rng.next_f32(800.0), rng.next_f32(600.0));
        let end = Point::new(rng.next_f32(800.0), rng.next_f32(600.0));
        let obstacles: Vec<Rect> = (0..4)
            .map(|_| {
                Rect::new(
                    rng.next_f32(800.0),
                    rng.next_f32(600.0),
                    100.0 + rng.next_f32(100.0),
                    60.0 + rng.next_f32(60.0),
                )
            })
            .collect();
        let padded: Vec<Rect> = obstacles.iter().map(|r| r.inflate(config.padding)).collect();

        let route = calculate_path_with_obstacles(start, end, &obstacles, &config);
        let direct_clear = is_route_clear(&[start, end], &padded);

        assert_eq!(route.waypoints.first(), Some(&start));
        assert_eq!(route.waypoints.last(), Some(&end));
        match route.kind {
            RouteKind::Direct => assert!(direct_clear),
            RouteKind::Fallback => {
                assert!(!direct_clear);
                assert_eq!(route.waypoints.len(), 2);
            }
            _ => {
                assert!(!direct_clear);
                assert!(is_route_clear(&route.waypoints, &padded), "{route:?}");
            }
        }
    }
}
