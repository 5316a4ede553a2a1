//! Interactive mind-map canvas engine.
//!
//! Hosts drive a [`CanvasController`] with [`CanvasCommand`]s and draw the
//! [`RenderSnapshot`] it publishes after each accepted command.

pub mod controller;
pub mod drag;
pub mod host;
pub mod input;
pub mod snapshot;
pub mod viewport;

pub use controller::CanvasController;
pub use drag::TimerId;
pub use host::{CanvasHost, NullHost};
pub use input::CanvasCommand;
pub use snapshot::{PendingHighlight, RenderSnapshot, RoutedEdge};
pub use viewport::{ViewportController, ViewportState};
