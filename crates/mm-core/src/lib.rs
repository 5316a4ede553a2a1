pub mod config;
pub mod connect;
pub mod curve;
pub mod geometry;
pub mod id;
pub mod model;
pub mod route;
pub mod store;

pub use config::{CanvasConfig, CurveConfig, CurveStyle, RouterConfig};
pub use connect::{ClickOutcome, ConnectionManager, ConnectionState};
pub use curve::PathCmd;
pub use geometry::{Point, Rect, Size};
pub use id::{EdgeId, NodeId};
pub use model::*;
pub use route::{Route, RouteKind, Waypoints, calculate_path_with_obstacles};
pub use store::NodeStore;
