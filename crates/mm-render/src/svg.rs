//! SVG output: path data strings for edge layers and a standalone export.

use crate::paint::{EDGE_STROKE_WIDTH, NODE_CORNER_RADIUS, build_scene};
use mm_core::PathCmd;
use mm_editor::RenderSnapshot;

const EDGE_COLOR: &str = "#333333";
const NODE_FILL: &str = "#FFFFFF";
const NODE_STROKE: &str = "#000000";
const PORT_COLOR: &str = "#007AFF";
const FONT_SIZE: f32 = 14.0;
const EXPORT_PADDING: f64 = 16.0;

/// SVG path data (`d` attribute) for a list of path commands.
pub fn path_data(commands: &[PathCmd]) -> String {
    let mut d = String::new();
    for cmd in commands {
        if !d.is_empty() {
            d.push(' ');
        }
        match *cmd {
            PathCmd::MoveTo(p) => d.push_str(&format!("M {} {}", p.x, p.y)),
            PathCmd::LineTo(p) => d.push_str(&format!("L {} {}", p.x, p.y)),
            PathCmd::QuadTo(c, p) => d.push_str(&format!("Q {} {} {} {}", c.x, c.y, p.x, p.y)),
            PathCmd::CubicTo(c1, c2, p) => d.push_str(&format!(
                "C {} {} {} {} {} {}",
                c1.x, c1.y, c2.x, c2.y, p.x, p.y
            )),
        }
    }
    d
}

/// Render a snapshot as a standalone SVG document, in screen space.
///
/// The document is cropped to the drawn content plus a small margin.
/// Empty snapshots produce an 800 × 600 blank canvas.
pub fn render_svg(snapshot: &RenderSnapshot) -> String {
    let scene = build_scene(snapshot);
    let (min_x, min_y, width, height) = match scene.bounds() {
        Some(b) => (
            b.x0 - EXPORT_PADDING,
            b.y0 - EXPORT_PADDING,
            b.width() + EXPORT_PADDING * 2.0,
            b.height() + EXPORT_PADDING * 2.0,
        ),
        None => (0.0, 0.0, 800.0, 600.0),
    };
    let scale = snapshot.viewport.scale;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"{min_x} {min_y} {width} {height}\">\n"
    ));
    svg.push_str("<style>\n");
    svg.push_str("  text { font-family: Inter, system-ui, sans-serif; }\n");
    svg.push_str("</style>\n");

    // Edges first so nodes cover their ends.
    for edge in &snapshot.edges {
        svg.push_str(&format!(
            "  <path data-edge=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{EDGE_COLOR}\" stroke-width=\"{EDGE_STROKE_WIDTH}\" />\n",
            edge.id,
            path_data(&edge.path)
        ));
    }

    let corner = NODE_CORNER_RADIUS * scale as f64;
    for ((id, rect), node) in scene.nodes.iter().zip(&snapshot.nodes) {
        let r = rect.rect();
        svg.push_str(&format!(
            "  <rect data-node=\"{id}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{corner}\" ry=\"{corner}\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\" stroke-width=\"1\" />\n",
            r.x0,
            r.y0,
            r.width(),
            r.height()
        ));
        let center = r.center();
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
            center.x,
            center.y,
            FONT_SIZE * scale,
            escape(&node.text)
        ));
    }

    for (_, dot) in &scene.ports {
        svg.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{PORT_COLOR}\" />\n",
            dot.center.x, dot.center.y, dot.radius
        ));
    }

    if let Some(ring) = scene.pending {
        svg.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{PORT_COLOR}\" stroke-width=\"2\" />\n",
            ring.center.x, ring.center.y, ring.radius
        ));
    }

    svg.push_str("</svg>");
    log::debug!(
        "SVG export: {} nodes, {} edges, {} bytes",
        snapshot.nodes.len(),
        snapshot.edges.len(),
        svg.len()
    );
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{
        CanvasConfig, ConnectionManager, Node, NodeId, NodeStore, Point, Port, PortRef, Size,
    };
    use mm_editor::ViewportState;
    use pretty_assertions::assert_eq;

    #[test]
    fn path_data_matches_edge_layer_format() {
        let p = Point::new;
        let d = path_data(&[
            PathCmd::MoveTo(p(100.0, 30.0)),
            PathCmd::LineTo(p(120.0, 30.0)),
            PathCmd::QuadTo(p(150.0, 30.0), p(150.0, 60.0)),
            PathCmd::CubicTo(p(1.5, 2.0), p(3.0, 4.0), p(5.0, 6.0)),
        ]);
        assert_eq!(d, "M 100 30 L 120 30 Q 150 30 150 60 C 1.5 2 3 4 5 6");
    }

    #[test]
    fn empty_path_data() {
        assert_eq!(path_data(&[]), "");
    }

    #[test]
    fn empty_snapshot_exports_blank_canvas() {
        let snap = RenderSnapshot::build(
            0,
            &NodeStore::new(),
            &ConnectionManager::new(),
            ViewportState::default(),
            &CanvasConfig::default(),
        );
        let svg = render_svg(&snap);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn export_contains_nodes_edges_and_escaped_text() {
        let a = NodeId::intern("svg_a");
        let b = NodeId::intern("svg_b");
        let mut nodes = NodeStore::new();
        nodes.insert(Node::with_size(a, Point::new(0.0, 0.0), Size::new(100.0, 60.0), "A & B"));
        nodes.insert(Node::with_size(b, Point::new(400.0, 0.0), Size::new(100.0, 60.0), "<b>"));
        let mut cm = ConnectionManager::new();
        cm.connect(PortRef::new(a, Port::Right), PortRef::new(b, Port::Left));
        cm.click_port(PortRef::new(a, Port::Left));
        let snap = RenderSnapshot::build(
            2,
            &nodes,
            &cm,
            ViewportState::default(),
            &CanvasConfig::default(),
        );

        let svg = render_svg(&snap);
        assert_eq!(svg.matches("<rect").count(), 2);
        assert_eq!(svg.matches("<path").count(), 1);
        // Four port dots plus the pending ring.
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains("d=\"M 100 30 C "));
        assert!(svg.contains(">A &amp; B</text>"));
        assert!(svg.contains(">&lt;b&gt;</text>"));
        assert!(svg.contains("data-node=\"svg_a\""));
    }
}
