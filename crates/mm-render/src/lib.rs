//! Rendering helpers for mind-map snapshots.
//!
//! - [`hit`]: screen point → node, port or edge
//! - [`paint`]: snapshot → kurbo shapes for a 2D backend
//! - [`svg`]: SVG path data and standalone export

pub mod hit;
pub mod paint;
pub mod svg;

pub use hit::{hit_test_edge, hit_test_node, hit_test_port, nodes_in_rect};
pub use paint::{Scene, build_scene, to_bez_path};
pub use svg::{path_data, render_svg};
