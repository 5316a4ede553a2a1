//! Pure geometry helpers shared by the router, the viewport and hit testing.
//!
//! Everything here is stateless. Canvas space is the logical coordinate
//! system nodes live in; screen space is canvas space after the viewport
//! transform `screen = canvas * scale + offset`.

use serde::{Deserialize, Serialize};

/// A 2D point (or vector) in either canvas or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Unit vector pointing from `self` to `other`.
    ///
    /// Returns `None` for coincident points so callers never divide by a
    /// zero length.
    pub fn direction_to(self, other: Point) -> Option<Point> {
        let len = distance(self, other);
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Point::new((other.x - self.x) / len, (other.y - self.y) / len))
    }
}

/// Width and height of a node's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment: points on the border count as inside.
    pub fn contains(&self, p: Point) -> bool {
        is_point_in_rect(p, self)
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Self {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// The four border segments, clockwise from the top edge.
    pub fn edges(&self) -> [(Point, Point); 4] {
        let tl = Point::new(self.left(), self.top());
        let tr = Point::new(self.right(), self.top());
        let br = Point::new(self.right(), self.bottom());
        let bl = Point::new(self.left(), self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

/// Canvas → screen: `canvas * scale + offset`.
pub fn canvas_to_screen(p: Point, scale: f32, offset: Point) -> Point {
    Point::new(p.x * scale + offset.x, p.y * scale + offset.y)
}

/// Screen → canvas: the exact inverse of [`canvas_to_screen`].
///
/// `scale` is always clamped to a positive range by the viewport, so the
/// division is safe for every value the controller can produce.
pub fn screen_to_canvas(p: Point, scale: f32, offset: Point) -> Point {
    Point::new((p.x - offset.x) / scale, (p.y - offset.y) / scale)
}

pub fn is_point_in_rect(p: Point, r: &Rect) -> bool {
    p.x >= r.left() && p.x <= r.right() && p.y >= r.top() && p.y <= r.bottom()
}

pub fn distance(a: Point, b: Point) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Parametric segment/segment test.
///
/// Solves for `ua` along `a1→a2` and `ub` along `b1→b2`; the segments touch
/// when both lie in `[0, 1]`. A zero denominator means the segments are
/// parallel (or degenerate) and is reported as no intersection.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let denom = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denom == 0.0 {
        return false;
    }

    let ua = ((b2.x - b1.x) * (a1.y - b1.y) - (b2.y - b1.y) * (a1.x - b1.x)) / denom;
    let ub = ((a2.x - a1.x) * (a1.y - b1.y) - (a2.y - a1.y) * (a1.x - b1.x)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// A segment hits a rectangle when either endpoint is inside it or the
/// segment crosses one of its four borders.
pub fn segment_intersects_rect(a: Point, b: Point, r: &Rect) -> bool {
    if r.contains(a) || r.contains(b) {
        return true;
    }
    r.edges()
        .iter()
        .any(|&(e1, e2)| segments_intersect(a, b, e1, e2))
}

/// Shortest distance from `p` to the segment `a→b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = clamp(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq, 0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}
