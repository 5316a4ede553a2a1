//! Drawable curves for edges.
//!
//! Two strategies:
//!
//! - **Waypoint smoothing** for routed polylines: each interior corner is
//!   replaced by a quadratic arc starting and ending a short distance either
//!   side of it. The curve rounds corners and does not pass exactly through
//!   the interior waypoints.
//! - **Port bezier** for unobstructed edges: a cubic whose control points
//!   leave each port along its outward direction.

use crate::geometry::{Point, distance};
use crate::model::Port;
use serde::{Deserialize, Serialize};

/// A single path command (SVG-like but simplified).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    /// Control point, end point.
    QuadTo(Point, Point),
    /// First control, second control, end point.
    CubicTo(Point, Point, Point),
}

impl PathCmd {
    pub fn end_point(&self) -> Point {
        match *self {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => p,
            PathCmd::QuadTo(_, p) | PathCmd::CubicTo(_, _, p) => p,
        }
    }

    /// Apply `f` to every point the command carries.
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            PathCmd::MoveTo(p) => PathCmd::MoveTo(f(p)),
            PathCmd::LineTo(p) => PathCmd::LineTo(f(p)),
            PathCmd::QuadTo(c, p) => PathCmd::QuadTo(f(c), f(p)),
            PathCmd::CubicTo(c1, c2, p) => PathCmd::CubicTo(f(c1), f(c2), f(p)),
        }
    }
}

/// Smooth curve through a polyline.
///
/// Fewer than two waypoints yield an empty path; exactly two yield a
/// straight line.
pub fn generate_path_through_waypoints(waypoints: &[Point], control_distance: f32) -> Vec<PathCmd> {
    let [first, .., last] = waypoints else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(waypoints.len() * 2);
    path.push(PathCmd::MoveTo(*first));
    for w in waypoints.windows(3) {
        let (prev, curr, next) = (w[0], w[1], w[2]);
        let before = corner_offset(curr, prev, control_distance);
        let after = corner_offset(curr, next, control_distance);
        path.push(PathCmd::LineTo(before));
        path.push(PathCmd::QuadTo(curr, after));
    }
    path.push(PathCmd::LineTo(*last));
    path
}

/// The point `control_distance` from `corner` towards `toward`, pulled in to
/// half the segment on short segments. A zero-length segment yields the
/// corner itself.
fn corner_offset(corner: Point, toward: Point, control_distance: f32) -> Point {
    let Some(dir) = corner.direction_to(toward) else {
        return corner;
    };
    let reach = control_distance.min(distance(corner, toward) / 2.0);
    corner.offset(dir.x * reach, dir.y * reach)
}

/// Control points for a cubic leaving `start_port` and entering `end_port`.
///
/// The offset is half the endpoint distance, capped at `offset_cap`; both
/// control points extend outward from their port.
pub fn bezier_control_points(
    start: Point,
    start_port: Port,
    end: Point,
    end_port: Port,
    offset_cap: f32,
) -> (Point, Point) {
    let offset = (distance(start, end) * 0.5).min(offset_cap);
    (
        start.offset(start_port.outward() * offset, 0.0),
        end.offset(end_port.outward() * offset, 0.0),
    )
}

pub fn port_bezier_path(
    start: Point,
    start_port: Port,
    end: Point,
    end_port: Port,
    offset_cap: f32,
) -> Vec<PathCmd> {
    let (c1, c2) = bezier_control_points(start, start_port, end, end_port, offset_cap);
    vec![PathCmd::MoveTo(start), PathCmd::CubicTo(c1, c2, end)]
}

/// Point at `t` on the cubic `p0, p1, p2, p3`.
pub fn cubic_point(t: f32, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let (uu, tt) = (u * u, t * t);
    let a = uu * u;
    let b = 3.0 * uu * t;
    let c = 3.0 * u * tt;
    let d = tt * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Point at `t` on the quadratic `p0, p1, p2`.
pub fn quad_point(t: f32, p0: Point, p1: Point, p2: Point) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

/// Sample a path into a polyline, `steps` samples per curve command.
pub fn flatten(path: &[PathCmd], steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let mut out = Vec::new();
    let mut cursor = Point::ZERO;
    for cmd in path {
        match *cmd {
            PathCmd::MoveTo(p) | PathCmd::LineTo(p) => out.push(p),
            PathCmd::QuadTo(c, p) => {
                out.extend((1..=steps).map(|i| quad_point(i as f32 / steps as f32, cursor, c, p)));
            }
            PathCmd::CubicTo(c1, c2, p) => {
                out.extend(
                    (1..=steps).map(|i| cubic_point(i as f32 / steps as f32, cursor, c1, c2, p)),
                );
            }
        }
        cursor = cmd.end_point();
    }
    out
}
