//! Inbound command vocabulary.
//!
//! Gesture recognizers and buttons in the host translate raw pointer and
//! touch input into `CanvasCommand`s. Commands are plain data and
//! deserialize from JSON, so a bridge can forward them verbatim:
//!
//! ```json
//! {"cmd": "update_drag", "node": "node_4", "dx": 12.0, "dy": -3.5}
//! ```

use crate::drag::TimerId;
use mm_core::{EdgeId, NodeId, Port};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum CanvasCommand {
    /// Create a node at the center of the visible area.
    AddNode,
    BeginDrag {
        node: NodeId,
    },
    /// Screen-space translation since the drag began.
    UpdateDrag {
        node: NodeId,
        dx: f32,
        dy: f32,
    },
    EndDrag {
        node: NodeId,
    },
    SetText {
        node: NodeId,
        text: String,
    },
    ClickPort {
        node: NodeId,
        port: Port,
    },
    CancelPendingConnection,
    /// Issued by the host after the user confirmed a delete prompt.
    DeleteNode {
        node: NodeId,
    },
    RemoveEdge {
        edge: EdgeId,
    },
    BeginPan,
    /// Screen-space translation since the pan began.
    UpdatePan {
        dx: f32,
        dy: f32,
    },
    EndPan,
    BeginPinch,
    /// Scale factor since the pinch began, and the current focal point.
    UpdatePinch {
        scale: f32,
        focal_x: f32,
        focal_y: f32,
    },
    EndPinch,
    /// A timer scheduled through the host has elapsed.
    TimerFired {
        timer: TimerId,
    },
}

impl CanvasCommand {
    /// Parse a single command from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid command: {e}"))
    }

    /// True for commands fired continuously while a finger moves.
    pub fn is_continuous(&self) -> bool {
        matches!(
            self,
            Self::UpdateDrag { .. } | Self::UpdatePan { .. } | Self::UpdatePinch { .. }
        )
    }
}
