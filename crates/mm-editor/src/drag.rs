//! Node drag gestures and their press-and-hold delete timers.
//!
//! Every active drag is keyed by node id, so several fingers can drag
//! different nodes at once without touching each other's state. A drag
//! starts a long-press timer; moving past the threshold, ending the drag or
//! deleting the node cancels it.

use mm_core::{NodeId, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle for a timer scheduled through the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub node: NodeId,
    /// Node position when the drag began (canvas space).
    pub origin: Point,
    /// Viewport scale when the drag began; screen deltas divide by it.
    pub scale: f32,
    /// Pending long-press timer, if not yet cancelled or fired.
    pub timer: Option<TimerId>,
    /// Movement exceeded the threshold at some point.
    pub moved: bool,
}

impl DragGesture {
    /// Canvas position for a screen-space translation since the drag began.
    pub fn position_for(&self, dx: f32, dy: f32) -> Point {
        self.origin.offset(dx / self.scale, dy / self.scale)
    }
}

#[derive(Debug, Default)]
pub struct DragTracker {
    active: HashMap<NodeId, DragGesture>,
    next_timer: u64,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a drag, replacing any previous gesture on the same
    /// node. Returns the new gesture's timer and the replaced gesture.
    pub fn begin(
        &mut self,
        node: NodeId,
        origin: Point,
        scale: f32,
    ) -> (TimerId, Option<DragGesture>) {
        let timer = TimerId(self.next_timer);
        self.next_timer += 1;
        let previous = self.active.insert(
            node,
            DragGesture {
                node,
                origin,
                scale,
                timer: Some(timer),
                moved: false,
            },
        );
        (timer, previous)
    }

    pub fn get(&self, node: NodeId) -> Option<&DragGesture> {
        self.active.get(&node)
    }

    /// Record a movement sample. Returns the gesture and, when this sample
    /// first crosses `threshold`, the timer that must now be cancelled.
    pub fn record_move(
        &mut self,
        node: NodeId,
        dx: f32,
        dy: f32,
        threshold: f32,
    ) -> Option<(DragGesture, Option<TimerId>)> {
        let gesture = self.active.get_mut(&node)?;
        let mut cancelled = None;
        if dx.abs() > threshold || dy.abs() > threshold {
            gesture.moved = true;
            cancelled = gesture.timer.take();
        }
        Some((*gesture, cancelled))
    }

    /// Stop tracking `node`, returning the finished gesture.
    pub fn end(&mut self, node: NodeId) -> Option<DragGesture> {
        self.active.remove(&node)
    }

    /// Consume a fired timer. Returns the gesture that owned it, or `None`
    /// if the timer was already cancelled or belongs to a finished drag.
    pub fn fire(&mut self, timer: TimerId) -> Option<DragGesture> {
        let gesture = self
            .active
            .values_mut()
            .find(|g| g.timer == Some(timer))?;
        gesture.timer = None;
        Some(*gesture)
    }

    pub fn is_dragging(&self, node: NodeId) -> bool {
        self.active.contains_key(&node)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_delta_divides_by_scale() {
        let mut tracker = DragTracker::new();
        let n = NodeId::intern("drag_scale");
        tracker.begin(n, Point::new(100.0, 100.0), 2.0);
        let (g, _) = tracker.record_move(n, 40.0, -20.0, 10.0).unwrap();
        assert_eq!(g.position_for(40.0, -20.0), Point::new(120.0, 90.0));
    }

    #[test]
    fn small_moves_keep_timer() {
        let mut tracker = DragTracker::new();
        let n = NodeId::intern("drag_small");
        let (timer, _) = tracker.begin(n, Point::ZERO, 1.0);
        let (g, cancelled) = tracker.record_move(n, 10.0, -10.0, 10.0).unwrap();
        assert_eq!(cancelled, None);
        assert_eq!(g.timer, Some(timer));
        assert!(!g.moved);
    }

    #[test]
    fn crossing_threshold_cancels_once() {
        let mut tracker = DragTracker::new();
        let n = NodeId::intern("drag_far");
        let (timer, _) = tracker.begin(n, Point::ZERO, 1.0);
        let (_, cancelled) = tracker.record_move(n, 10.5, 0.0, 10.0).unwrap();
        assert_eq!(cancelled, Some(timer));
        let (g, cancelled) = tracker.record_move(n, 30.0, 0.0, 10.0).unwrap();
        assert_eq!(cancelled, None);
        assert!(g.moved);
        assert_eq!(tracker.fire(timer), None);
    }

    #[test]
    fn timers_are_unique_and_stale_ones_ignored() {
        let mut tracker = DragTracker::new();
        let n = NodeId::intern("drag_restart");
        let (first, _) = tracker.begin(n, Point::ZERO, 1.0);
        let (second, replaced) = tracker.begin(n, Point::ZERO, 1.0);
        assert_ne!(first, second);
        assert_eq!(replaced.and_then(|g| g.timer), Some(first));
        assert_eq!(tracker.fire(first), None);
        assert_eq!(tracker.fire(second).map(|g| g.node), Some(n));
        // Fired timers are consumed.
        assert_eq!(tracker.fire(second), None);
    }

    #[test]
    fn independent_nodes() {
        let mut tracker = DragTracker::new();
        let a = NodeId::intern("drag_multi_a");
        let b = NodeId::intern("drag_multi_b");
        tracker.begin(a, Point::ZERO, 1.0);
        tracker.begin(b, Point::new(50.0, 50.0), 1.0);
        tracker.record_move(a, 100.0, 0.0, 10.0);
        assert!(tracker.get(a).unwrap().moved);
        assert!(!tracker.get(b).unwrap().moved);
        tracker.end(a);
        assert!(!tracker.is_dragging(a));
        assert!(tracker.is_dragging(b));
        assert_eq!(tracker.active_count(), 1);
    }
}
