//! Tunable constants for the canvas, loadable from JSON.
//!
//! Every field has a default, so a host may supply a partial document
//! such as `{"max_scale": 4.0}`.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};

/// How a two-point (unobstructed) edge is turned into a drawable curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStyle {
    /// Cubic curve leaving each port along its outward direction.
    #[default]
    PortBezier,
    /// Plain waypoint smoothing (a straight line for two points).
    Waypoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Margin added around every obstacle before collision tests.
    pub padding: f32,
    /// Try lane detours around the blocking obstacles before giving up.
    pub lane_search: bool,
    /// Extra gap between a lane and the padded obstacles it skirts.
    pub lane_clearance: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            lane_search: true,
            lane_clearance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Distance of the corner control points from each interior waypoint.
    pub control_distance: f32,
    /// Upper bound on the port-bezier control offset.
    pub port_offset_cap: f32,
    pub style: CurveStyle,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            control_distance: 30.0,
            port_offset_cap: 150.0,
            style: CurveStyle::PortBezier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub router: RouterConfig,
    pub curve: CurveConfig,
    /// Press-and-hold duration before a delete confirmation is requested.
    pub long_press_ms: u64,
    /// Screen-space movement that turns a press into a plain drag.
    pub drag_threshold: f32,
    /// Logical screen size; new nodes spawn at its center.
    pub spawn_size: Size,
    pub placeholder_text: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.5,
            router: RouterConfig::default(),
            curve: CurveConfig::default(),
            long_press_ms: 800,
            drag_threshold: 10.0,
            spawn_size: Size::new(400.0, 400.0),
            placeholder_text: "New Node".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: CanvasConfig =
            serde_json::from_str(json).map_err(|e| format!("invalid canvas config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that would break the viewport or router invariants.
    /// Every tunable must be finite.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("router.padding", self.router.padding),
            ("router.lane_clearance", self.router.lane_clearance),
            ("curve.control_distance", self.curve.control_distance),
            ("curve.port_offset_cap", self.curve.port_offset_cap),
            ("drag_threshold", self.drag_threshold),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be finite, got {value}"));
        }
        if self.min_scale <= 0.0 {
            return Err(format!("min_scale must be positive, got {}", self.min_scale));
        }
        if self.min_scale > self.max_scale {
            return Err(format!(
                "min_scale ({}) exceeds max_scale ({})",
                self.min_scale, self.max_scale
            ));
        }
        if self.router.padding < 0.0 || self.drag_threshold < 0.0 {
            return Err("padding and drag_threshold must be non-negative".to_string());
        }
        Ok(())
    }
}
