//! Pan / zoom state and gesture handling.
//!
//! Both gestures snapshot the transform when they begin and compute every
//! update as `f(baseline, delta)`. Updates never accumulate, so a pinch and
//! an incidental one-finger pan recognized at the same time cannot drift:
//! each update lands on a transform derived from a fixed baseline.

use mm_core::geometry::{self, Point, clamp};
use serde::Serialize;

/// The pan/zoom transform: `screen = canvas * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    pub scale: f32,
    pub offset: Point,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ZERO,
        }
    }
}

impl ViewportState {
    pub fn screen_to_canvas(&self, p: Point) -> Point {
        geometry::screen_to_canvas(p, self.scale, self.offset)
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        geometry::canvas_to_screen(p, self.scale, self.offset)
    }
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    min_scale: f32,
    max_scale: f32,
    /// Offset captured by `begin_pan`.
    pan_baseline: Option<Point>,
    /// Transform captured by `begin_pinch`.
    pinch_baseline: Option<ViewportState>,
}

impl ViewportController {
    /// Start at the identity view, with the scale pulled into bounds.
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        Self {
            state: ViewportState {
                scale: clamp(1.0, min_scale, max_scale),
                offset: Point::ZERO,
            },
            min_scale,
            max_scale,
            pan_baseline: None,
            pinch_baseline: None,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn offset(&self) -> Point {
        self.state.offset
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        self.state.screen_to_canvas(p)
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        self.state.canvas_to_screen(p)
    }

    // ─── Pan ─────────────────────────────────────────────────────────────

    pub fn begin_pan(&mut self) {
        self.pan_baseline = Some(self.state.offset);
    }

    /// `offset = baseline + (dx, dy)`. Ignored outside a pan gesture.
    pub fn update_pan(&mut self, dx: f32, dy: f32) -> bool {
        let Some(base) = self.pan_baseline else {
            log::debug!("PAN update without begin, ignored");
            return false;
        };
        if !dx.is_finite() || !dy.is_finite() {
            return false;
        }
        let offset = base.offset(dx, dy);
        let changed = offset != self.state.offset;
        self.state.offset = offset;
        changed
    }

    pub fn end_pan(&mut self) {
        self.pan_baseline = None;
    }

    // ─── Pinch ───────────────────────────────────────────────────────────

    pub fn begin_pinch(&mut self) {
        self.pinch_baseline = Some(self.state);
    }

    /// Zoom by `factor` relative to the pinch baseline, keeping the canvas
    /// point under `focal` (screen space) fixed on screen.
    pub fn update_pinch(&mut self, factor: f32, focal: Point) -> bool {
        let Some(base) = self.pinch_baseline else {
            log::debug!("PINCH update without begin, ignored");
            return false;
        };
        if !factor.is_finite() || factor <= 0.0 || !focal.x.is_finite() || !focal.y.is_finite() {
            return false;
        }

        let scale = clamp(base.scale * factor, self.min_scale, self.max_scale);
        let ratio = scale / base.scale;
        let next = ViewportState {
            scale,
            offset: Point::new(
                focal.x - (focal.x - base.offset.x) * ratio,
                focal.y - (focal.y - base.offset.y) * ratio,
            ),
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    pub fn end_pinch(&mut self) {
        self.pinch_baseline = None;
    }

    pub fn is_gesturing(&self) -> bool {
        self.pan_baseline.is_some() || self.pinch_baseline.is_some()
    }
}
