//! Capabilities the host UI provides to the canvas.
//!
//! The core never shows dialogs or owns a clock. It asks the host to
//! schedule timers and to prompt the user, and the host answers through
//! ordinary commands (`TimerFired`, `DeleteNode`).

use crate::drag::TimerId;
use mm_core::NodeId;
use std::time::Duration;

pub trait CanvasHost {
    /// Arrange for `TimerFired { timer }` to be delivered after `delay`.
    fn schedule_timer(&mut self, timer: TimerId, delay: Duration);

    /// Drop a scheduled timer. Cancelling an unknown or fired timer is fine.
    fn cancel_timer(&mut self, timer: TimerId);

    /// Show a yes/no prompt for deleting `node`. On "yes" the host issues
    /// `DeleteNode { node }`; on "no" it does nothing.
    fn request_delete_confirmation(&mut self, node: NodeId);
}

/// A host that ignores every request. Long-press deletion is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl CanvasHost for NullHost {
    fn schedule_timer(&mut self, _timer: TimerId, _delay: Duration) {}

    fn cancel_timer(&mut self, _timer: TimerId) {}

    fn request_delete_confirmation(&mut self, _node: NodeId) {}
}
