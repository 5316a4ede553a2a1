//! Obstacle-avoiding edge routing.
//!
//! The router is a cheap heuristic, not a shortest-path solver. It runs for
//! every edge on every frame, so it only ever tests a handful of candidate
//! polylines against the padded obstacle boxes:
//!
//! 1. the direct segment;
//! 2. three midpoint detours in fixed order: vertical-first, horizontal-first,
//!    diagonal;
//! 3. (optional) lanes skirting the blocking obstacles above, below, left or
//!    right, shortest first.
//!
//! If nothing is clear the direct segment is returned anyway. The router
//! never fails; a blocked edge degrades to a crossing line.

use crate::config::RouterConfig;
use crate::geometry::{Point, Rect, distance, segment_intersects_rect};
use serde::Serialize;
use smallvec::{SmallVec, smallvec};

/// A routed polyline in canvas space. Never shorter than two points.
pub type Waypoints = SmallVec<[Point; 4]>;

/// Lane passes before giving up; each pass may widen the blocking set.
const MAX_LANE_PASSES: usize = 3;

/// Which strategy produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Nothing in the way.
    Direct,
    VerticalFirst,
    HorizontalFirst,
    Diagonal,
    /// Skirts the blocking obstacles along a lane outside their bounds.
    Lane,
    /// Every detour was blocked; the direct segment crosses an obstacle.
    Fallback,
}

impl RouteKind {
    /// True for the two-point results (`Direct` and `Fallback`).
    pub fn is_straight(self) -> bool {
        matches!(self, RouteKind::Direct | RouteKind::Fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub kind: RouteKind,
    pub waypoints: Waypoints,
}

/// Route from `start` to `end` around `obstacles` (unpadded node bounds).
///
/// The result is `[start, end]` exactly when the direct segment clears every
/// padded obstacle, or when every detour is blocked (`RouteKind::Fallback`).
pub fn calculate_path_with_obstacles(
    start: Point,
    end: Point,
    obstacles: &[Rect],
    config: &RouterConfig,
) -> Route {
    let padded: Vec<Rect> = obstacles.iter().map(|r| r.inflate(config.padding)).collect();

    let blockers: Vec<&Rect> = padded
        .iter()
        .filter(|r| segment_intersects_rect(start, end, r))
        .collect();
    if blockers.is_empty() {
        return Route {
            kind: RouteKind::Direct,
            waypoints: smallvec![start, end],
        };
    }

    let mid = start.midpoint(end);
    let candidates: [(RouteKind, Waypoints); 3] = [
        (
            RouteKind::VerticalFirst,
            smallvec![
                start,
                Point::new(start.x, mid.y),
                Point::new(end.x, mid.y),
                end
            ],
        ),
        (
            RouteKind::HorizontalFirst,
            smallvec![
                start,
                Point::new(mid.x, start.y),
                Point::new(mid.x, end.y),
                end
            ],
        ),
        (RouteKind::Diagonal, smallvec![start, mid, end]),
    ];
    for (kind, waypoints) in candidates {
        if is_route_clear(&waypoints, &padded) {
            log::trace!("ROUTE {kind:?} with {} waypoints", waypoints.len());
            return Route { kind, waypoints };
        }
    }

    if config.lane_search {
        let mut envelope = blockers
            .iter()
            .skip(1)
            .fold(*blockers[0], |acc, r| acc.union(r));
        if let Some(waypoints) = lane_detour(start, end, &mut envelope, &padded, config) {
            log::trace!("ROUTE Lane via {:?}", &waypoints[1..waypoints.len() - 1]);
            return Route {
                kind: RouteKind::Lane,
                waypoints,
            };
        }
    }

    log::trace!("ROUTE fallback: all detours blocked");
    Route {
        kind: RouteKind::Fallback,
        waypoints: smallvec![start, end],
    }
}

/// Try the four lanes around `envelope`, widening it with whatever blocks
/// them, for up to [`MAX_LANE_PASSES`] passes.
fn lane_detour(
    start: Point,
    end: Point,
    envelope: &mut Rect,
    padded: &[Rect],
    config: &RouterConfig,
) -> Option<Waypoints> {
    let gap = config.lane_clearance;
    for _ in 0..MAX_LANE_PASSES {
        let above = envelope.top() - gap;
        let below = envelope.bottom() + gap;
        let left = envelope.left() - gap;
        let right = envelope.right() + gap;
        let lanes: [Waypoints; 4] = [
            smallvec![start, Point::new(start.x, above), Point::new(end.x, above), end],
            smallvec![start, Point::new(start.x, below), Point::new(end.x, below), end],
            smallvec![start, Point::new(left, start.y), Point::new(left, end.y), end],
            smallvec![start, Point::new(right, start.y), Point::new(right, end.y), end],
        ];

        let best = lanes
            .iter()
            .filter(|lane| is_route_clear(lane, padded))
            .fold(None::<&Waypoints>, |best, lane| match best {
                Some(b) if route_length(b) <= route_length(lane) => Some(b),
                _ => Some(lane),
            });
        if let Some(best) = best {
            return Some(best.clone());
        }

        let before = *envelope;
        for lane in &lanes {
            for r in padded {
                if lane
                    .windows(2)
                    .any(|w| segment_intersects_rect(w[0], w[1], r))
                {
                    *envelope = envelope.union(r);
                }
            }
        }
        if *envelope == before {
            break;
        }
    }
    None
}

/// Every consecutive segment of `waypoints` misses every rectangle in `padded`.
pub fn is_route_clear(waypoints: &[Point], padded: &[Rect]) -> bool {
    waypoints
        .windows(2)
        .all(|w| is_segment_clear(w[0], w[1], padded))
}

pub fn is_segment_clear(a: Point, b: Point, padded: &[Rect]) -> bool {
    !padded.iter().any(|r| segment_intersects_rect(a, b, r))
}

/// Total polyline length.
pub fn route_length(waypoints: &[Point]) -> f32 {
    waypoints.windows(2).map(|w| distance(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> RouterConfig {
        RouterConfig::default()
    }

    #[test]
    fn clear_line_is_direct() {
        let route = calculate_path_with_obstacles(
            Point::new(100.0, 30.0),
            Point::new(400.0, 30.0),
            &[],
            &cfg(),
        );
        assert_eq!(route.kind, RouteKind::Direct);
        assert_eq!(
            route.waypoints.as_slice(),
            &[Point::new(100.0, 30.0), Point::new(400.0, 30.0)]
        );
    }

    #[test]
    fn obstacle_off_the_line_is_ignored() {
        let route = calculate_path_with_obstacles(
            Point::new(100.0, 30.0),
            Point::new(400.0, 30.0),
            &[Rect::new(200.0, 200.0, 100.0, 60.0)],
            &cfg(),
        );
        assert_eq!(route.kind, RouteKind::Direct);
    }

    #[test]
    fn vertical_first_wins_when_clear() {
        // Diagonal line from (0,0) to (400,200) with a box sitting on the
        // straight path; the L through midY = 100 clears it.
        let start = Point::new(0.0, 0.0);
        let end = Point::new(400.0, 200.0);
        let obstacle = Rect::new(150.0, 40.0, 60.0, 20.0);
        let route = calculate_path_with_obstacles(start, end, &[obstacle], &cfg());
        assert_eq!(route.kind, RouteKind::VerticalFirst);
        assert_eq!(
            route.waypoints.as_slice(),
            &[
                start,
                Point::new(0.0, 100.0),
                Point::new(400.0, 100.0),
                end
            ]
        );
    }

    #[test]
    fn horizontal_first_when_vertical_blocked() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(400.0, 200.0);
        // Blocks the direct line and the y = 100 leg of the vertical-first
        // route; the x = 200 leg of the horizontal-first route passes by.
        let obstacle = Rect::new(60.0, 80.0, 80.0, 40.0);
        let route = calculate_path_with_obstacles(start, end, &[obstacle], &cfg());
        assert_eq!(route.kind, RouteKind::HorizontalFirst);
        assert_eq!(route.waypoints[1], Point::new(200.0, 0.0));
        assert!(is_route_clear(&route.waypoints, &[obstacle.inflate(20.0)]));
    }

    #[test]
    fn node_between_ports_routes_around_it() {
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        let c = Rect::new(200.0, -10.0, 100.0, 80.0);
        let route = calculate_path_with_obstacles(start, end, &[c], &cfg());
        assert_eq!(route.kind, RouteKind::Lane);
        assert_eq!(route.waypoints.first(), Some(&start));
        assert_eq!(route.waypoints.last(), Some(&end));
        assert!(is_route_clear(&route.waypoints, &[c.inflate(20.0)]));
        // Above lane: padded top (-30) minus clearance.
        assert_eq!(route.waypoints[1], Point::new(100.0, -40.0));
    }

    #[test]
    fn without_lane_search_a_blocked_route_falls_back() {
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        let c = Rect::new(200.0, -10.0, 100.0, 80.0);
        let config = RouterConfig {
            lane_search: false,
            ..cfg()
        };
        let route = calculate_path_with_obstacles(start, end, &[c], &config);
        assert_eq!(route.kind, RouteKind::Fallback);
        assert_eq!(route.waypoints.as_slice(), &[start, end]);
    }

    #[test]
    fn lanes_widen_past_neighbouring_obstacles() {
        let start = Point::new(100.0, 30.0);
        let end = Point::new(400.0, 30.0);
        let middle = Rect::new(200.0, -10.0, 100.0, 80.0);
        // Sits right on the first "above" lane but off the direct line.
        let roof = Rect::new(150.0, -120.0, 200.0, 60.0);
        // And one under the "below" lane.
        let floor = Rect::new(150.0, 110.0, 200.0, 60.0);
        let obstacles = [middle, roof, floor];
        let route = calculate_path_with_obstacles(start, end, &obstacles, &cfg());
        assert_eq!(route.kind, RouteKind::Lane);
        let padded: Vec<Rect> = obstacles.iter().map(|r| r.inflate(20.0)).collect();
        assert!(is_route_clear(&route.waypoints, &padded));
    }

    #[test]
    fn fully_enclosed_endpoint_falls_back() {
        // End port sits inside a padded obstacle: nothing can be clear.
        let start = Point::new(0.0, 0.0);
        let end = Point::new(300.0, 0.0);
        let wall = Rect::new(290.0, -50.0, 100.0, 100.0);
        let route = calculate_path_with_obstacles(start, end, &[wall], &cfg());
        assert_eq!(route.kind, RouteKind::Fallback);
        assert_eq!(route.waypoints.as_slice(), &[start, end]);
    }

    #[test]
    fn route_length_sums_segments() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(3.0, 10.0),
        ];
        assert!((route_length(&pts) - 11.0).abs() < 1e-5);
    }
}
